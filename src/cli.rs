use crate::{config::parse_u8_maybe_hex, Error, Result};

/// Options for the `run` command; values are `None` when not provided on CLI.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RunOptions {
    pub interval: Option<f64>,
    pub mount: Option<String>,
    pub iface: Option<String>,
    pub host_ip: Option<String>,
    pub font: Option<String>,
    pub i2c_bus: Option<u8>,
    pub i2c_addr: Option<u8>,
    pub contrast: Option<u8>,
    pub log_level: Option<String>,
    pub log_file: Option<String>,
}

/// Parsed command-line intent.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Run(RunOptions),
    ShowHelp,
    ShowVersion,
}

impl Command {
    pub fn parse(args: &[String]) -> Result<Self> {
        if args.is_empty() {
            return Ok(Command::Run(RunOptions::default()));
        }

        let mut iter = args.iter();
        match iter.next().map(|s| s.as_str()) {
            Some("run") => Ok(Command::Run(parse_run_options(&mut iter)?)),
            Some("--help") | Some("-h") => Ok(Command::ShowHelp),
            Some("--version") | Some("-V") => Ok(Command::ShowVersion),
            Some(flag) if flag.starts_with('-') => {
                // `run` may be left implicit; feed the already-consumed flag
                // back through the run parser with the rest.
                let mut flags: Vec<String> = Vec::with_capacity(args.len());
                flags.push(flag.to_string());
                flags.extend(iter.map(|s| s.to_string()));
                let mut iter = flags.iter();
                Ok(Command::Run(parse_run_options(&mut iter)?))
            }
            Some(cmd) => Err(Error::InvalidArgs(format!(
                "unknown command '{cmd}', try --help"
            ))),
            None => Ok(Command::Run(RunOptions::default())),
        }
    }

    pub fn help() -> &'static str {
        concat!(
            "oledstat - host-status OLED daemon\n",
            "\n",
            "USAGE:\n",
            "  oledstat run [options]\n",
            "  oledstat --help\n",
            "  oledstat --version\n",
            "\n",
            "OPTIONS:\n",
            "  --interval <secs>   Refresh interval in seconds (default: 2.0)\n",
            "  --mount <path>      Mount path to report disk usage for (default: /)\n",
            "  --iface <name>      Network interface to take the IP from\n",
            "  --host-ip <addr>    Report this IP verbatim instead of probing\n",
            "  --font <name>       Panel font: 5x8, 6x10 or 7x13 (default: 6x10)\n",
            "  --i2c-bus <n>       I2C bus number (default: 1)\n",
            "  --i2c-addr <addr>   Display address, hex or decimal (default: 0x3c)\n",
            "  --contrast <n>      Panel contrast 0-255 (default: 255)\n",
            "  --log-level <lvl>   error, warn, info, debug or trace (default: info)\n",
            "  --log-file <path>   Append log lines to this file as well\n",
            "  -h, --help          Show this help\n",
            "  -V, --version       Show version\n",
            "\n",
            "Each option mirrors an OLEDSTAT_* environment variable; flags win.\n",
        )
    }

    pub fn print_help() {
        println!("{}", Self::help());
    }
}

fn parse_run_options(iter: &mut std::slice::Iter<String>) -> Result<RunOptions> {
    let mut opts = RunOptions::default();

    while let Some(flag) = iter.next() {
        match flag.as_str() {
            "--interval" => {
                let raw = take_value(flag, iter)?;
                opts.interval = Some(raw.parse().map_err(|_| {
                    Error::InvalidArgs("interval must be a number of seconds".to_string())
                })?);
            }
            "--mount" => {
                opts.mount = Some(take_value(flag, iter)?);
            }
            "--iface" => {
                opts.iface = Some(take_value(flag, iter)?);
            }
            "--host-ip" => {
                opts.host_ip = Some(take_value(flag, iter)?);
            }
            "--font" => {
                opts.font = Some(take_value(flag, iter)?);
            }
            "--i2c-bus" => {
                let raw = take_value(flag, iter)?;
                opts.i2c_bus = Some(raw.parse().map_err(|_| {
                    Error::InvalidArgs("i2c-bus must be a bus number".to_string())
                })?);
            }
            "--i2c-addr" => {
                let raw = take_value(flag, iter)?;
                opts.i2c_addr = Some(parse_u8_maybe_hex(&raw).ok_or_else(|| {
                    Error::InvalidArgs("i2c-addr must be an address like 0x3c".to_string())
                })?);
            }
            "--contrast" => {
                let raw = take_value(flag, iter)?;
                opts.contrast = Some(raw.parse().map_err(|_| {
                    Error::InvalidArgs("contrast must be 0-255".to_string())
                })?);
            }
            "--log-level" => {
                opts.log_level = Some(take_value(flag, iter)?);
            }
            "--log-file" => {
                opts.log_file = Some(take_value(flag, iter)?);
            }
            other => {
                return Err(Error::InvalidArgs(format!(
                    "unknown flag '{other}', try --help"
                )));
            }
        }
    }

    Ok(opts)
}

fn take_value(flag: &str, iter: &mut std::slice::Iter<String>) -> Result<String> {
    iter.next()
        .cloned()
        .ok_or_else(|| Error::InvalidArgs(format!("expected a value after {flag}")))
}
