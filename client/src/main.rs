/*
 * SPDX-License-Identifier: MIT
 *
 * Permission is hereby granted, free of charge, to any person obtaining a
 * copy of this software and associated documentation files (the "Software"),
 * to deal in the Software without restriction, including without limitation
 * the rights to use, copy, modify, merge, publish, distribute, sublicense,
 * and/or sell copies of the Software, and to permit persons to whom the
 * Software is furnished to do so, subject to the following conditions:
 *
 * The above copyright notice and this permission notice shall be included in
 * all copies or substantial portions of the Software.
 *
 * THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
 * IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
 * FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL
 * THE AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
 * LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING
 * FROM, OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER
 * DEALINGS IN THE SOFTWARE.
 */

/* bmc-cli: power and virtual media control for HP iLO and Dell iDRAC BMCs.
 *
 * USAGE: ./bmc-cli [--config config.yaml] [-v] power status
 * Connection settings come from config.yaml and/or ILO_* / IDRAC_* environment variables.
 * Run `bmc-cli config generate` for a sample config file.
 * Run with `-v` for more output.
 */

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use libbmc::{Redfish, SystemInfo, SystemPowerControl, VirtualMedia};
use tracing_subscriber::filter::{EnvFilter, LevelFilter};
use tracing_subscriber::fmt::Layer;
use tracing_subscriber::prelude::*;

mod config;
use config::Config;

#[derive(Parser, Debug)]
#[command(name = "bmc-cli", version, about = "Control HP iLO and Dell iDRAC BMCs over Redfish")]
struct Args {
    /// Config file. Defaults to ./config.yaml if present
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log at DEBUG level. Default is INFO
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Server power control
    #[command(subcommand)]
    Power(PowerCommand),
    /// Virtual media management
    #[command(subcommand, visible_alias = "vm")]
    Virtualmedia(VirtualMediaCommand),
    /// Configuration file helpers
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[derive(Subcommand, Debug)]
enum PowerCommand {
    /// Power the server on
    On,
    /// Force the server off
    Off,
    /// Show power state and health
    Status,
}

#[derive(Subcommand, Debug)]
enum VirtualMediaCommand {
    /// Attach an ISO image to the virtual CD/DVD drive
    Mount {
        /// http(s) URL of the image, reachable from the BMC
        image_url: String,
    },
    /// Eject all inserted virtual media
    Unmount,
    /// List virtual media slots
    List,
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write a sample config.yaml to the current directory
    Generate,
    /// Show the active configuration, without the password
    Show,
}

fn main() -> Result<(), anyhow::Error> {
    let args = Args::parse();

    let log_level = if args.verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };
    let env_filter = EnvFilter::from_default_env()
        .add_directive(log_level.into())
        .add_directive("hyper=warn".parse()?);
    tracing_subscriber::registry()
        .with(Layer::default().compact())
        .with(env_filter)
        .init();

    if let Command::Config(ConfigCommand::Generate) = args.command {
        let path = config::generate_sample(&std::env::current_dir()?)?;
        println!("Sample configuration file created at {}", path.display());
        println!("Please edit the file with your BMC credentials and settings.");
        return Ok(());
    }

    let config = Config::load(args.config.as_deref())?;
    let vendor = config.vendor()?;

    if let Command::Config(ConfigCommand::Show) = args.command {
        print!("{}", show_config(&config)?);
        return Ok(());
    }

    let endpoint = config.endpoint()?;
    tracing::info!("Connecting to {vendor} at {}", endpoint.base_url());
    let bmc = libbmc::new_client(&config.bmc_type, endpoint)?;

    match args.command {
        Command::Power(cmd) => power(bmc.as_ref(), cmd),
        Command::Virtualmedia(cmd) => virtual_media(bmc.as_ref(), cmd),
        Command::Config(_) => Ok(()),
    }
}

fn power(bmc: &dyn Redfish, cmd: PowerCommand) -> anyhow::Result<()> {
    match cmd {
        PowerCommand::On => {
            println!("Powering on server...");
            bmc.set_power_state(SystemPowerControl::On)
                .context("Failed to power on server")?;
            println!("Server power on command sent successfully");
        }
        PowerCommand::Off => {
            println!("Powering off server...");
            bmc.set_power_state(SystemPowerControl::ForceOff)
                .context("Failed to power off server")?;
            println!("Server power off command sent successfully");
        }
        PowerCommand::Status => {
            let info = bmc
                .get_system_info()
                .context("Failed to get system status")?;
            print!("{}", format_status(&info));
        }
    }
    Ok(())
}

fn virtual_media(bmc: &dyn Redfish, cmd: VirtualMediaCommand) -> anyhow::Result<()> {
    match cmd {
        VirtualMediaCommand::Mount { image_url } => {
            println!("Mounting virtual media: {image_url}");
            bmc.mount_virtual_media(&image_url)
                .context("Failed to mount virtual media")?;
            println!("Virtual media mounted successfully");
        }
        VirtualMediaCommand::Unmount => {
            println!("Unmounting virtual media...");
            bmc.unmount_virtual_media()
                .context("Failed to unmount virtual media")?;
            println!("Virtual media unmounted successfully");
        }
        VirtualMediaCommand::List => {
            let media = bmc
                .get_virtual_media()
                .context("Failed to get virtual media")?;
            print!("{}", format_media_table(&media));
        }
    }
    Ok(())
}

fn format_status(info: &SystemInfo) -> String {
    format!(
        "Power State: {}\nHealth: {}\nState: {}\n",
        info.power_state, info.health, info.state
    )
}

fn yes_no(b: bool) -> &'static str {
    if b {
        "Yes"
    } else {
        "No"
    }
}

fn format_media_table(media: &[VirtualMedia]) -> String {
    if media.is_empty() {
        return "No virtual media slots found\n".to_string();
    }
    let mut out = format!(
        "{:<15} {:<15} {:<10} {:<10} {}\n{}\n",
        "Name",
        "Media Types",
        "Connected",
        "Inserted",
        "Image",
        "-".repeat(81)
    );
    for vm in media {
        let media_types = if vm.media_types.is_empty() {
            "None".to_string()
        } else {
            vm.media_types.join(", ")
        };
        let image = match vm.image.as_deref() {
            Some(image) if !image.is_empty() => image,
            _ => "-",
        };
        out.push_str(&format!(
            "{:<15} {:<15} {:<10} {:<10} {}\n",
            vm.name,
            media_types,
            yes_no(vm.connected),
            yes_no(vm.inserted),
            image
        ));
    }
    out
}

fn show_config(config: &Config) -> anyhow::Result<String> {
    let bmc = config.active()?;
    let password = if bmc.has_password() {
        "***configured***"
    } else {
        "***not configured***"
    };
    Ok(format!(
        "Current Configuration:\n=====================\nBMC Type: {}\nHost: {}\nUsername: {}\nPort: {}\nUse HTTPS: {}\nPassword: {}\n",
        config.vendor()?,
        bmc.host,
        bmc.username,
        bmc.port,
        bmc.use_https,
        password
    ))
}
