use hqdeals::command_argument_builder;
use hqdeals::handlers::{
    GlobalOptions, handle_browse, handle_categories, handle_offers, handle_render,
};
use hqdeals_core::print_banner;

#[tokio::main]
async fn main() {
    let cmd = command_argument_builder();
    let chosen_command = cmd.get_matches();
    let options = GlobalOptions::from_matches(&chosen_command);

    // Show banner unless --quiet flag is set
    if !options.quiet {
        print_banner();
    }

    match chosen_command.subcommand() {
        None | Some(("browse", _)) => handle_browse(&options).await,
        Some(("categories", _)) => handle_categories(&options).await,
        Some(("offers", primary_command)) => handle_offers(primary_command, &options).await,
        Some(("render", primary_command)) => handle_render(primary_command, &options).await,
        _ => unreachable!("clap should ensure we don't get here"),
    }
}
