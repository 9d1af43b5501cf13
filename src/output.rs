//! Output formatting and the plotting pipe.

use std::io::{self, Write};
use std::process::{Child, Command, Stdio};

use crate::episode::Sample;

/// Decimal places kept in the charge column.
const CHARGE_DECIMALS: usize = 2;

/// External plotter, fed tab-delimited samples on stdin.
pub const PLOT_PROGRAM: &str = "scatterplot.py";
/// Fixed plotter arguments for the unplugged-period view.
pub const PLOT_ARGS: &[&str] = &[
    "--unix-time",
    "x",
    "--time-unit",
    "hr",
    "--point-size",
    "5",
    "--y-label",
    "Charge (%)",
    "--title",
    "Battery charge during last unplugged period",
];

/// Write samples as `timestamp<TAB>charge` lines, charge rounded to two
/// decimal places.
pub fn write_samples<W: Write + ?Sized>(out: &mut W, samples: &[Sample]) -> io::Result<()> {
    for sample in samples {
        writeln!(
            out,
            "{}\t{:.prec$}",
            sample.timestamp,
            sample.value,
            prec = CHARGE_DECIMALS
        )?;
    }
    Ok(())
}

/// Spawn the plotter with its stdin piped, ready for [`write_samples`].
pub fn spawn_plotter() -> io::Result<Child> {
    Command::new(PLOT_PROGRAM)
        .args(PLOT_ARGS)
        .stdin(Stdio::piped())
        .spawn()
}
