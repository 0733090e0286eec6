//! pro-os-connect CLI
//!
//! Command-line interface for querying and controlling a Pro OS device.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, Subcommand};
use serde_json::{json, Map, Value};
use tracing_subscriber::{fmt, EnvFilter};

use pro_os_connect::client::DEFAULT_ECHO_PAYLOAD;
use pro_os_connect::config::DEFAULT_PORT;
use pro_os_connect::protocol::CrcQuirks;
use pro_os_connect::{Client, Config, FramePolicy, Result};

/// pro-os-connect CLI
#[derive(Parser, Debug)]
#[command(name = "pro-os-connect")]
#[command(about = "Pro OS Connect CLI")]
#[command(version)]
struct Args {
    /// Hostname or IP address of the Pro OS device
    #[arg(short, long)]
    device: String,

    /// Device TCP port
    #[arg(short, long, default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Response timeout in seconds
    #[arg(short, long, default_value = "5.0")]
    timeout: f64,

    /// Output JSON format
    #[arg(short, long)]
    json: bool,

    /// Abort on the first malformed frame instead of waiting for the deadline
    #[arg(long)]
    fail_fast: bool,

    /// File listing commands whose payload CRC is not enforced
    #[arg(long, value_name = "FILE")]
    crc_quirks: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Query the protocol version
    GetProtocolVersion,

    /// Send a payload and check that it comes back unchanged
    Echo {
        /// Test payload for echo command
        #[arg(short, long)]
        payload: Option<String>,
    },

    /// Reboot the device
    Reboot,

    /// Read all telemetry fields
    GetTelemetry,

    /// Report whether the pump is running
    IsRunning,

    /// Read the device clock
    GetTime,

    /// Set the device clock (ISO-8601, defaults to local now)
    SetTime {
        time: Option<String>,
    },

    /// Start the pump
    PumpStart,

    /// Stop the pump
    PumpStop,

    /// Read the software version
    GetSoftwareVersion,

    /// Read the serial number
    GetSerialNumber,

    /// Read the network configuration
    GetNetworkConfiguration,

    /// Read the current setpoint from telemetry
    GetSetpoint,

    /// Set the setpoint
    SetSetpoint {
        /// Setpoint value to set
        setpoint: u32,
    },
}

/// A command result, rendered as `key=value` text or JSON
enum Output {
    /// Printed as-is in text mode, `{"result": value}` in JSON mode
    Value(Value),
    /// Text and JSON renderings differ
    Custom { text: String, json: Value },
    /// Printed as `key=value` lines
    Fields(Map<String, Value>),
}

fn main() -> ExitCode {
    let args = Args::parse();

    // Logs go to stderr so stdout carries only results
    let default_filter = if args.verbose {
        "info,pro_os_connect=debug"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));
    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let config = match build_config(&args) {
        Ok(config) => config,
        Err(e) => {
            print_error(args.json, &e.to_string());
            return ExitCode::FAILURE;
        }
    };

    tracing::debug!("Connecting to {}", config.addr());

    match Client::connect(config).and_then(|client| {
        let output = run(&client, &args.command);
        let closed = client.disconnect();
        let output = output?;
        closed?;
        Ok(output)
    }) {
        Ok(output) => {
            print_output(args.json, output);
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("Command failed: {}", e);
            print_error(args.json, &e.to_string());
            ExitCode::FAILURE
        }
    }
}

fn build_config(args: &Args) -> Result<Config> {
    let timeout = Duration::try_from_secs_f64(args.timeout).map_err(|e| {
        pro_os_connect::ProOsError::Config(format!("invalid timeout {}: {}", args.timeout, e))
    })?;

    let mut builder = Config::builder()
        .host(&args.device)
        .port(args.port)
        .timeout(timeout)
        .connect_timeout(timeout);

    if args.fail_fast {
        builder = builder.frame_policy(FramePolicy::FailFast);
    }
    if let Some(path) = &args.crc_quirks {
        builder = builder.crc_quirks(CrcQuirks::load(path)?);
    }

    Ok(builder.build())
}

fn run(client: &Client, command: &Commands) -> Result<Output> {
    let output = match command {
        Commands::GetProtocolVersion => Output::Value(json!(client.get_protocol_version()?)),
        Commands::Echo { payload } => {
            let data = payload
                .as_deref()
                .map(str::as_bytes)
                .unwrap_or(DEFAULT_ECHO_PAYLOAD);
            client.echo(data)?;
            Output::Value(json!(true))
        }
        Commands::Reboot => {
            client.reboot()?;
            Output::Value(json!(true))
        }
        Commands::GetTelemetry => match serde_json::to_value(client.get_telemetry()?) {
            Ok(Value::Object(fields)) => Output::Fields(fields),
            Ok(other) => Output::Value(other),
            Err(e) => return Err(pro_os_connect::ProOsError::Payload(e.to_string())),
        },
        Commands::IsRunning => {
            let running = client.is_running()?;
            Output::Custom {
                text: if running { "1" } else { "0" }.to_string(),
                json: json!({ "running": running }),
            }
        }
        Commands::GetTime => Output::Value(json!(client
            .get_time()?
            .format("%Y-%m-%dT%H:%M:%S%.f")
            .to_string())),
        Commands::SetTime { time } => {
            let time = match time {
                Some(text) => pro_os_connect::payload::decode_time(text.as_bytes())?,
                None => chrono::Local::now().naive_local(),
            };
            client.set_time(&time)?;
            Output::Value(json!(true))
        }
        Commands::PumpStart => {
            client.pump_start()?;
            Output::Value(json!(true))
        }
        Commands::PumpStop => {
            client.pump_stop()?;
            Output::Value(json!(true))
        }
        Commands::GetSoftwareVersion => Output::Value(json!(client.get_software_version()?)),
        Commands::GetSerialNumber => Output::Value(json!(client.get_serial_number()?)),
        Commands::GetNetworkConfiguration => {
            Output::Value(json!(client.get_network_configuration()?))
        }
        Commands::GetSetpoint => {
            let setpoint = client.get_setpoint()?;
            Output::Custom {
                text: setpoint.to_string(),
                json: json!({ "setpoint": setpoint }),
            }
        }
        Commands::SetSetpoint { setpoint } => {
            client.set_setpoint(*setpoint)?;
            Output::Custom {
                text: format!("Setpoint set to {}", setpoint),
                json: json!({ "result": true, "setpoint": setpoint }),
            }
        }
    };
    Ok(output)
}

fn print_output(as_json: bool, output: Output) {
    match (output, as_json) {
        (Output::Value(value), false) => println!("{}", plain(&value)),
        (Output::Value(value), true) => print_json(&json!({ "result": value })),
        (Output::Custom { text, .. }, false) => println!("{}", text),
        (Output::Custom { json, .. }, true) => print_json(&json),
        (Output::Fields(fields), false) => {
            for (key, value) in &fields {
                println!("{}={}", key, plain(value));
            }
        }
        (Output::Fields(fields), true) => print_json(&Value::Object(fields)),
    }
}

fn print_error(as_json: bool, message: &str) {
    if as_json {
        print_json(&json!({ "result": false, "error": message }));
    } else {
        println!("{}", message);
    }
}

fn print_json(value: &Value) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{}", text),
        Err(e) => tracing::error!("Failed to render JSON: {}", e),
    }
}

/// Strings without quotes, everything else as JSON
fn plain(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
