pub mod logging;

use clap::{
    builder::styling::{AnsiColor, Effects, Styles},
    Arg, ColorChoice, Command,
};

pub const ARG_PORT: &str = "port";
pub const ARG_CONFIG: &str = "config";
pub const ARG_DATA: &str = "data";
pub const ARG_LOGS_DIR: &str = "logs-dir";

#[must_use]
pub fn new() -> Command {
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default());

    let command = Command::new("tenantgate")
        .about("Multi-tenant API gateway")
        .version(env!("CARGO_PKG_VERSION"))
        .color(ColorChoice::Auto)
        .styles(styles)
        .arg(
            Arg::new(ARG_PORT)
                .short('p')
                .long("port")
                .help("Port to listen on")
                .default_value("8080")
                .env("TENANTGATE_PORT")
                .value_parser(clap::value_parser!(u16)),
        )
        .arg(
            Arg::new(ARG_CONFIG)
                .short('c')
                .long("config")
                .help("JSON configuration file (server.api, server.plugins, log)")
                .env("TENANTGATE_CONFIG"),
        )
        .arg(
            Arg::new(ARG_DATA)
                .short('d')
                .long("data")
                .help("JSON seed with the users and organizations to serve")
                .env("TENANTGATE_DATA"),
        )
        .arg(
            Arg::new(ARG_LOGS_DIR)
                .long("logs-dir")
                .help("Directory holding the security log")
                .default_value("logs")
                .env("TENANTGATE_LOGS_DIR"),
        );

    logging::with_args(command)
}
