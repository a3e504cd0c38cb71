mod parse;

use std::process::ExitCode;

use clap::ArgMatches;
use env_logger::Env;
use usage_grammar::arguments::{self, Action};
use usage_grammar::util::text::join_args;
use usage_grammar::{Bindings, Error, Grammar};

fn main() -> Result<ExitCode, Error> {
	let matches = parse::parse_arguments();
	init_logging(matches.get_count("verbose"));

	match matches.subcommand() {
		Some(("check", sub)) => check(sub),
		Some(("installer", sub)) => installer(sub),
		_ => Ok(ExitCode::FAILURE),
	}
}

fn init_logging(verbosity: u8) {
	let level = match verbosity {
		0 => "warn",
		1 => "debug",
		_ => "trace",
	};
	env_logger::Builder::from_env(Env::default().default_filter_or(level)).init();
}

fn trailing_args<'a>(matches: &'a ArgMatches, id: &str) -> Vec<&'a str> {
	matches
		.get_many::<String>(id)
		.map(|values| values.map(String::as_str).collect())
		.unwrap_or_default()
}

fn check(matches: &ArgMatches) -> Result<ExitCode, Error> {
	let usage = matches.get_one::<String>("usage").map(String::as_str).unwrap_or_default();
	let json = matches.get_flag("json");
	let grammar = Grammar::compile(usage, matches.get_flag("fix-ambiguity"))?;

	if matches.get_flag("tree") {
		if json {
			println!("{}", serde_json::to_string_pretty(grammar.root())?);
		} else {
			println!("{}", grammar.root());
		}
	}

	let input = join_args(&trailing_args(matches, "input"));
	let bindings = match grammar.parse(&input) {
		Ok(Some(bindings)) => bindings,
		Ok(None) => {
			eprintln!("Input doesn't match. Usage: {}", grammar.root());
			return Ok(ExitCode::FAILURE);
		}
		Err(e) if e.is_input() => {
			eprintln!("{e}\nUsage: {}", grammar.root());
			return Ok(ExitCode::FAILURE);
		}
		Err(e) => return Err(e),
	};

	if json {
		println!("{}", serde_json::to_string_pretty(&bindings)?);
	} else {
		print_bindings(&bindings);
	}

	Ok(ExitCode::SUCCESS)
}

fn print_bindings(bindings: &Bindings) {
	for (key, value) in bindings {
		match value {
			Some(value) => println!("{key}={value}"),
			None => println!("{key}"),
		}
	}
}

fn installer(matches: &ArgMatches) -> Result<ExitCode, Error> {
	let grammar = Action::grammar()?;
	let action = Action::from_args(&trailing_args(matches, "args"), &grammar);

	if action == Action::DisplayHelp {
		println!("{}", Action::help_text(&arguments::executable_name()));
		return Ok(ExitCode::FAILURE);
	}

	if matches.get_flag("json") {
		println!("{}", serde_json::to_string_pretty(&action)?);
	} else {
		println!("{action}");
	}

	Ok(ExitCode::SUCCESS)
}
