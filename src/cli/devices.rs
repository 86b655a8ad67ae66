//! Input device listing command.

use crate::cli::common::{print_json, CliResult};
use crate::constants::INPUT_DEVICE_DIR;
use crate::device::touch::{describe_devices, InputDeviceInfo};
use clap::Args;
use std::path::PathBuf;

/// List input devices and mark the ones usable as touchscreens
#[derive(Args, Debug)]
pub struct DevicesArgs {
    /// Directory to scan
    #[arg(long, value_name = "DIR", default_value = INPUT_DEVICE_DIR)]
    dir: PathBuf,

    /// Output as JSON
    #[arg(long)]
    json: bool,
}

impl DevicesArgs {
    /// Execute devices command
    pub fn execute(&self) -> CliResult<()> {
        let devices = describe_devices(&self.dir)?;
        if self.json {
            return print_json(&devices);
        }
        print_human_readable(&devices);
        Ok(())
    }
}

fn print_human_readable(devices: &[InputDeviceInfo]) {
    if devices.is_empty() {
        println!("No readable input devices found.");
        return;
    }
    for device in devices {
        let marker = if device.touchscreen { "*" } else { " " };
        print!("{marker} {}  {}", device.path.display(), device.name);
        if let Some(axes) = device.axes {
            print!(
                "  x={}..{} y={}..{}",
                axes.x.min, axes.x.max, axes.y.min, axes.y.max
            );
        }
        println!();
    }
    println!();
    println!("* reports absolute X/Y (usable as touchscreen)");
}
