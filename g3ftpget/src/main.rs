/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::io;
use std::net::Ipv4Addr;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use anyhow::{Context, anyhow};
use clap::builder::PossibleValuesParser;
use clap::{Arg, ArgAction, ArgMatches, Command, value_parser};
use clap_complete::Shell;
use log::{debug, info};

use g3_ftp_client::{
    FTP_DEFAULT_PORT, FtpClientConfig, FtpCredentials, FtpPassiveAddressPolicy, FtpSession,
    FtpTarget,
};

mod config;
mod connection;
mod logger;
mod sink;

const ARG_COMPLETION: &str = "completion";
const ARG_USER: &str = "user";
const ARG_PASSWORD: &str = "password";
const ARG_HOST: &str = "host";
const ARG_URL_PATH: &str = "url-path";
const ARG_PORT: &str = "port";
const ARG_OUTPUT: &str = "output";
const ARG_CONFIG: &str = "config";
const ARG_PASSIVE_ADDRESS: &str = "passive-address";
const ARG_SOURCE_IP: &str = "source-ip";
const ARG_VERBOSE: &str = "verbose";

fn build_cli_args() -> Command {
    Command::new("g3ftpget")
        .about("Retrieve a single file from a FTP server in passive mode")
        .arg(
            Arg::new(ARG_COMPLETION)
                .num_args(1)
                .value_name("SHELL")
                .long("completion")
                .value_parser(value_parser!(Shell))
                .exclusive(true),
        )
        .arg(
            Arg::new(ARG_USER)
                .help("FTP username")
                .num_args(1)
                .value_name("USER")
                .required_unless_present(ARG_COMPLETION),
        )
        .arg(
            Arg::new(ARG_PASSWORD)
                .help("FTP password")
                .num_args(1)
                .value_name("PASSWORD")
                .required_unless_present(ARG_COMPLETION),
        )
        .arg(
            Arg::new(ARG_HOST)
                .help("FTP server host name or ipv4 address")
                .num_args(1)
                .value_name("HOST")
                .required_unless_present(ARG_COMPLETION),
        )
        .arg(
            Arg::new(ARG_URL_PATH)
                .help("Path of the file on the server")
                .num_args(1)
                .value_name("URL-PATH")
                .required_unless_present(ARG_COMPLETION),
        )
        .arg(
            Arg::new(ARG_PORT)
                .help("FTP server port")
                .num_args(1)
                .value_name("PORT")
                .value_parser(value_parser!(u16).range(1..))
                .default_value("21")
                .long("port")
                .short('P'),
        )
        .arg(
            Arg::new(ARG_OUTPUT)
                .help("Local file to save to, default to ~/Downloads/<file name>")
                .num_args(1)
                .value_name("OUTPUT FILE")
                .value_parser(value_parser!(PathBuf))
                .long("output")
                .short('o'),
        )
        .arg(
            Arg::new(ARG_CONFIG)
                .help("FTP client config file in yaml format")
                .num_args(1)
                .value_name("CONFIG FILE")
                .value_parser(value_parser!(PathBuf))
                .long("config")
                .short('c'),
        )
        .arg(
            Arg::new(ARG_PASSIVE_ADDRESS)
                .help("Which address to use for the passive data connection")
                .num_args(1)
                .value_name("POLICY")
                .value_parser(PossibleValuesParser::new(["server", "control"]))
                .long("passive-address"),
        )
        .arg(
            Arg::new(ARG_SOURCE_IP)
                .help("Source ipv4 address")
                .num_args(1)
                .value_name("IP ADDRESS")
                .value_parser(value_parser!(Ipv4Addr))
                .long("source")
                .short('s'),
        )
        .arg(
            Arg::new(ARG_VERBOSE)
                .help("Show verbose message, repeat to show the ftp commands")
                .num_args(0)
                .action(ArgAction::Count)
                .short('v')
                .long("verbose"),
        )
}

fn get_required<'a>(args: &'a ArgMatches, id: &str) -> anyhow::Result<&'a String> {
    args.get_one::<String>(id)
        .ok_or_else(|| anyhow!("no {id} argument set"))
}

fn load_client_config(args: &ArgMatches) -> anyhow::Result<FtpClientConfig> {
    let mut config = match args.get_one::<PathBuf>(ARG_CONFIG) {
        Some(path) => config::load_from_file(path)?,
        None => FtpClientConfig::default(),
    };
    if let Some(s) = args.get_one::<String>(ARG_PASSIVE_ADDRESS) {
        config.passive_address = FtpPassiveAddressPolicy::from_str(s)
            .map_err(|_| anyhow!("invalid passive address policy {s}"))?;
    }
    Ok(config)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let args = build_cli_args().get_matches();

    if let Some(target) = args.get_one::<Shell>(ARG_COMPLETION) {
        let mut app = build_cli_args();
        let bin_name = app.get_name().to_string();
        clap_complete::generate(*target, &mut app, bin_name, &mut io::stdout());
        return Ok(());
    }

    let verbose_level = args.get_count(ARG_VERBOSE);
    logger::SyncLogger::new(verbose_level)
        .into_global_logger()
        .context("failed to setup logger")?;

    let user = get_required(&args, ARG_USER)?;
    let password = get_required(&args, ARG_PASSWORD)?;
    let host = get_required(&args, ARG_HOST)?;
    let url_path = get_required(&args, ARG_URL_PATH)?;

    let mut target = FtpTarget::new(host, url_path);
    target.set_port(
        args.get_one::<u16>(ARG_PORT)
            .copied()
            .unwrap_or(FTP_DEFAULT_PORT),
    );
    let credentials = FtpCredentials::new(user, password);

    let output = match args.get_one::<PathBuf>(ARG_OUTPUT) {
        Some(path) => path.clone(),
        None => sink::default_sink_path(url_path)?,
    };

    let config = Arc::new(load_client_config(&args)?);
    debug!("using ftp client config {config:?}");

    let mut conn_provider = connection::LocalConnectionProvider::default();
    if let Some(ip) = args.get_one::<Ipv4Addr>(ARG_SOURCE_IP) {
        conn_provider.set_bind_ip(*ip);
    }

    let mut session = FtpSession::connect(&target, conn_provider, &config)
        .await
        .context(format!("failed to connect to {target}"))?;
    info!("connected to ftp server {}", session.control_peer());

    session
        .login(&credentials)
        .await
        .context(format!("failed to login as user {user}"))?;

    let data_addr = session
        .enter_passive()
        .await
        .context("failed to enter passive mode")?;
    info!("data connection established to {data_addr}");

    let mut file = sink::create_sink(&output).await?;
    let summary = session
        .retrieve(target.url_path(), &mut file)
        .await
        .context(format!("failed to retrieve {target}"))?;

    info!(
        "{} bytes received from {}",
        summary.size(),
        summary.data_addr()
    );
    println!("{} saved to {} ({} bytes)", target, output.display(), summary.size());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_args() {
        build_cli_args().debug_assert();
    }

    #[test]
    fn parse_positional() {
        let args = build_cli_args()
            .try_get_matches_from([
                "g3ftpget",
                "alice",
                "secret",
                "ftp.example.net",
                "pub/hello.txt",
                "-P",
                "2121",
                "--passive-address",
                "control",
                "-vv",
            ])
            .unwrap();
        assert_eq!(get_required(&args, ARG_USER).unwrap(), "alice");
        assert_eq!(get_required(&args, ARG_URL_PATH).unwrap(), "pub/hello.txt");
        assert_eq!(args.get_one::<u16>(ARG_PORT).copied(), Some(2121));
        assert_eq!(args.get_count(ARG_VERBOSE), 2);

        let config = load_client_config(&args).unwrap();
        assert_eq!(config.passive_address, FtpPassiveAddressPolicy::ControlPeer);
    }

    #[test]
    fn default_port() {
        let args = build_cli_args()
            .try_get_matches_from(["g3ftpget", "alice", "secret", "127.0.0.1", "a.txt"])
            .unwrap();
        assert_eq!(args.get_one::<u16>(ARG_PORT).copied(), Some(21));
        let config = load_client_config(&args).unwrap();
        assert_eq!(config, FtpClientConfig::default());
    }

    #[test]
    fn missing_url_path() {
        assert!(
            build_cli_args()
                .try_get_matches_from(["g3ftpget", "alice", "secret", "127.0.0.1"])
                .is_err()
        );
    }

    #[test]
    fn invalid_passive_address() {
        assert!(
            build_cli_args()
                .try_get_matches_from([
                    "g3ftpget",
                    "alice",
                    "secret",
                    "127.0.0.1",
                    "a.txt",
                    "--passive-address",
                    "active",
                ])
                .is_err()
        );
    }
}
