use crate::commands::cli::ParseArgs;
use cpjudge_core::api as core_api;

pub fn handle_parse(args: ParseArgs) -> Result<i32, core_api::CliError> {
    let canonical = core_api::parse(&args.text)?;
    println!("{canonical}");
    Ok(0)
}
