//! Font fitting report

use anyhow::{Context, Result};
use glyphdust_core::CanvasSize;
use glyphdust_raster::{fit_font_size, BlockRasterizer, FitAxis, SvgRasterizer};

pub fn run(text: &str, width: u32, height: u32, font: Option<String>, blocks: bool) -> Result<()> {
    let target = CanvasSize::new(width, height);
    let measured = if blocks {
        BlockRasterizer::default().measure(text)
    } else {
        let mut rasterizer = SvgRasterizer::new();
        if let Some(family) = font {
            rasterizer = rasterizer.with_font_family(family);
        }
        rasterizer
            .measure(text)
            .context("Failed to measure text")?
    };

    let fit = fit_font_size(measured, target);
    let axis = match fit.axis {
        FitAxis::Width => "width",
        FitAxis::Height => "height",
    };

    match measured {
        Some(extent) => println!(
            "Measured \"{}\": {:.1}x{:.1} at 100px",
            text, extent.width, extent.height
        ),
        None => println!("\"{text}\" has no measurable extent"),
    }
    println!(
        "Fits {}x{} at {:.2}px ({}-driven)",
        width, height, fit.font_size, axis
    );
    Ok(())
}
