// src/report.rs

//! Text rendering of a decomposition for the command line.

use csv::WriterBuilder;
use std::io::{self, Write};
use termcolor::{Color, ColorSpec, WriteColor};

use crate::eigen::Eigendecomposition;

/// Writes eigenvalues as the first CSV record, then one record per eigenvector row.
pub fn write_csv<W: Write>(decomp: &Eigendecomposition, writer: W) -> io::Result<()> {
    let mut wtr = WriterBuilder::new().has_headers(false).from_writer(writer);
    wtr.serialize(&decomp.eigenvalues)?;
    for row in decomp.eigenvectors.chunks(decomp.n.max(1)) {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Human-readable table: one line per eigenpair with the eigenvector as a column.
pub fn write_table<W: Write>(decomp: &Eigendecomposition, mut out: W, precision: usize) -> io::Result<()> {
    let width = precision + 8;
    writeln!(out, "eigenvalues:")?;
    for (i, value) in decomp.eigenvalues.iter().enumerate() {
        writeln!(out, "  λ[{}] = {:>width$.precision$}", i, value)?;
    }
    writeln!(out, "eigenvectors (column i pairs with λ[i]):")?;
    for row in decomp.eigenvectors.chunks(decomp.n.max(1)) {
        write!(out, " ")?;
        for value in row {
            write!(out, " {:>width$.precision$}", value)?;
        }
        writeln!(out)?;
    }
    Ok(())
}

/// Heatmap of the eigenvector matrix: red for +1, blue for −1, black for 0.
pub fn print_heatmap<W: WriteColor>(decomp: &Eigendecomposition, out: &mut W) -> io::Result<()> {
    for row in decomp.eigenvectors.chunks(decomp.n.max(1)) {
        for &value in row {
            out.set_color(ColorSpec::new().set_fg(Some(loading_color(value))))?;
            write!(out, "██")?;
        }
        out.reset()?;
        writeln!(out)?;
    }
    Ok(())
}

/// Single-row heatmap of the eigenvalues, scaled between min and max.
pub fn print_eigenvalues_heatmap<W: WriteColor>(eigenvalues: &[f64], out: &mut W) -> io::Result<()> {
    let max_value = eigenvalues.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let min_value = eigenvalues.iter().copied().fold(f64::INFINITY, f64::min);

    for &value in eigenvalues {
        let intensity = if (max_value - min_value) != 0.0 {
            ((value - min_value) / (max_value - min_value)).clamp(0.0, 1.0)
        } else {
            0.0
        };
        let color = if value == 0.0 {
            Color::Black
        } else {
            Color::Rgb((intensity * 255.0) as u8, 0, ((1.0 - intensity) * 255.0) as u8)
        };
        out.set_color(ColorSpec::new().set_fg(Some(color)))?;
        write!(out, "██")?;
    }
    out.reset()?;
    writeln!(out)?;
    Ok(())
}

fn loading_color(value: f64) -> Color {
    if value == 0.0 {
        return Color::Black;
    }
    let intensity = (0.5 * value + 0.5).clamp(0.0, 1.0);
    Color::Rgb((intensity * 255.0) as u8, 0, ((1.0 - intensity) * 255.0) as u8)
}
