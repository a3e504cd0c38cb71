use std::fmt;

use serde::Serialize;

use crate::grammar::Grammar;
use crate::input::Bindings;
use crate::util::error::Error;
use crate::util::text::join_args;

pub const USAGE: &str = "help | listVersions [--snapshots] | install (client [--no-profile] | server [--server-dir=<dir>]) <minecraft-version> [<loader-version>]";

/// What the installer command line asks for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum Action {
	DisplayHelp,
	ListVersions {
		snapshots: bool,
	},
	InstallClient {
		minecraft_version: String,
		// latest loader if not given
		loader_version: Option<String>,
		generate_profile: bool,
	},
	InstallServer {
		minecraft_version: String,
		loader_version: Option<String>,
		server_dir: Option<String>,
	},
}

impl Action {
	pub fn grammar() -> Result<Grammar, Error> {
		Grammar::compile(USAGE, false)
	}

	/// Maps the bindings of a successful match against [`USAGE`] to an action.
	pub fn resolve(bindings: &Bindings) -> Self {
		match bindings.get("unnamed_0") {
			Some("help") => Self::DisplayHelp,
			Some("listVersions") => Self::ListVersions {
				snapshots: bindings.contains_key("snapshots"),
			},
			Some("install") => {
				let Some(minecraft_version) = bindings.get("minecraft-version") else {
					return Self::DisplayHelp;
				};
				let minecraft_version = minecraft_version.to_string();
				let loader_version = bindings.get("loader-version").map(String::from);

				match bindings.get("unnamed_1") {
					Some("client") => Self::InstallClient {
						minecraft_version,
						loader_version,
						generate_profile: !bindings.contains_key("no-profile"),
					},
					Some("server") => Self::InstallServer {
						minecraft_version,
						loader_version,
						server_dir: bindings.get("server-dir").map(String::from),
					},
					_ => Self::DisplayHelp,
				}
			}
			_ => Self::DisplayHelp,
		}
	}

	/// Action for one input string, [`Action::DisplayHelp`] if it can't be parsed.
	pub fn parse(input: &str, grammar: &Grammar) -> Self {
		match grammar.parse(input) {
			Ok(Some(bindings)) => Self::resolve(&bindings),
			Ok(None) => Self::DisplayHelp,
			Err(e) => {
				log::warn!("{e}");
				Self::DisplayHelp
			}
		}
	}

	pub fn from_args<S: AsRef<str>>(args: &[S], grammar: &Grammar) -> Self {
		Self::parse(&join_args(args), grammar)
	}

	pub fn help_text(executable: &str) -> String {
		let mut help = format!("USAGE: {executable} installer <command>\n\n");
		help.push_str("help                                      - Show this message\n");
		help.push_str("listVersions [--snapshots]                - List Minecraft and loader versions\n");
		help.push_str("install client <minecraft-version> [<loader-version>] [--no-profile]\n");
		help.push_str("                                          - Install the loader for the launcher\n");
		help.push_str("install server <minecraft-version> [<loader-version>] [--server-dir=<dir>]\n");
		help.push_str("                                          - Install a server, into <dir> if given\n");
		help
	}
}

impl fmt::Display for Action {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let loader = |version: &Option<String>| version.clone().unwrap_or_else(|| "latest".into());

		match self {
			Self::DisplayHelp => write!(f, "display help"),
			Self::ListVersions { snapshots } => {
				write!(f, "list versions")?;
				if *snapshots {
					write!(f, " including snapshots")?;
				}
				Ok(())
			}
			Self::InstallClient {
				minecraft_version,
				loader_version,
				generate_profile,
			} => {
				write!(
					f,
					"install client for {minecraft_version} with loader {}",
					loader(loader_version)
				)?;
				if !generate_profile {
					write!(f, " without launcher profile")?;
				}
				Ok(())
			}
			Self::InstallServer {
				minecraft_version,
				loader_version,
				server_dir,
			} => {
				write!(
					f,
					"install server for {minecraft_version} with loader {}",
					loader(loader_version)
				)?;
				if let Some(dir) = server_dir {
					write!(f, " into {dir}")?;
				}
				Ok(())
			}
		}
	}
}

/// File name of the running executable, for usage messages.
pub fn executable_name() -> String {
	std::env::current_exe()
		.ok()
		.and_then(|path| path.file_name().map(|name| name.to_string_lossy().into_owned()))
		.unwrap_or_else(|| String::from("usage-grammar"))
}
