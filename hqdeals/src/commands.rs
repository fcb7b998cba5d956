use crate::CLAP_STYLING;
use clap::{arg, command};
use hqdeals_fetch::DEFAULT_BASE_URL;
use url::Url;

fn category_arg() -> clap::Arg {
    arg!(-c --"category" <CATEGORY>)
        .required(false)
        .help("Category value to show (default: the first category)")
}

pub fn command_argument_builder() -> clap::Command {
    clap::Command::new("hqdeals")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("hqdeals")
        .about("Browse hand picked, discounted offers")
        .styles(CLAP_STYLING)
        .arg(
            arg!(-q --"quiet" "Suppress banner and non-essential output")
                .required(false)
                .global(true),
        )
        .arg(
            arg!(-v --"verbose" "Enable debug logging")
                .required(false)
                .global(true),
        )
        .arg(
            arg!(--"base-url" <URL>)
                .required(false)
                .help("Root of the deals site serving the offers/ files")
                .value_parser(clap::value_parser!(Url))
                .default_value(DEFAULT_BASE_URL)
                .global(true),
        )
        .arg(
            arg!(--"timeout" <SECONDS>)
                .required(false)
                .help("Request timeout in seconds")
                .value_parser(clap::value_parser!(u64).range(1..))
                .default_value("10")
                .global(true),
        )
        .subcommand_required(false)
        .subcommand(
            command!("browse")
                .about("Browse the offers in an interactive terminal view (default)"),
        )
        .subcommand(
            command!("categories").about("Print the offer categories and when they were updated"),
        )
        .subcommand(
            command!("offers")
                .about("Print the offers of a category")
                .arg(category_arg()),
        )
        .subcommand(
            command!("render")
                .about("Render the deals page as a report")
                .arg(category_arg())
                .arg(
                    arg!(-f --"format" <FORMAT>)
                        .required(false)
                        .help("Report format: text, html, json, markdown")
                        .value_parser(["text", "html", "json", "markdown", "md"])
                        .default_value("text"),
                )
                .arg(
                    arg!(-o --"output" <PATH>)
                        .required(false)
                        .help("Save report to file (default: display to screen)"),
                ),
        )
}
