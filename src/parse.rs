use clap::{command, Arg, ArgAction, ArgMatches, Command};

pub fn parse_arguments() -> ArgMatches {
	command!()
		.about("Compile usage strings and match command lines against them")
		.subcommand_required(true)
		.arg(
			Arg::new("verbose")
				.short('v')
				.long("verbose")
				.action(ArgAction::Count)
				.global(true)
				.help("Log compiled grammars (-v) and matcher backtracking (-vv)"),
		)
		.subcommand(
			Command::new("check")
				.about("Match an input against a usage string and print the bindings")
				.arg(
					Arg::new("usage")
						.short('u')
						.long("usage")
						.required(true)
						.help("Usage string, e.g. \"add <item>... [--force]\""),
				)
				.arg(
					Arg::new("fix-ambiguity")
						.short('f')
						.long("fix-ambiguity")
						.action(ArgAction::SetTrue)
						.help("Allow only one optional positional element per alternative"),
				)
				.arg(
					Arg::new("tree")
						.short('t')
						.long("tree")
						.action(ArgAction::SetTrue)
						.help("Print the compiled grammar"),
				)
				.arg(
					Arg::new("json")
						.short('j')
						.long("json")
						.action(ArgAction::SetTrue)
						.help("Print as JSON"),
				)
				.arg(
					Arg::new("input")
						.num_args(0..)
						.trailing_var_arg(true)
						.allow_hyphen_values(true)
						.help("Command input, one argument per token"),
				),
		)
		.subcommand(
			Command::new("installer")
				.about("Resolve an installer command line to its action")
				.arg(
					Arg::new("json")
						.short('j')
						.long("json")
						.action(ArgAction::SetTrue)
						.help("Print as JSON"),
				)
				.arg(
					Arg::new("args")
						.num_args(0..)
						.trailing_var_arg(true)
						.allow_hyphen_values(true)
						.help("Installer arguments, e.g. install client 1.20.1"),
				),
		)
		.get_matches()
}
