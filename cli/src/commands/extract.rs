//! `cpjudge extract`: statement in, canonical case files out.
use crate::commands::cli::ExtractArgs;
use cpjudge_core::api as core_api;
use cpjudge_core::api::StatementSource;

pub fn handle_extract(
    args: ExtractArgs,
    cfg: &core_api::AppConfig,
) -> Result<i32, core_api::CliError> {
    let mut source: Box<dyn StatementSource> = match (&args.statement, args.stdin) {
        (Some(path), false) => Box::new(core_api::FileStatement::new(path)),
        (None, true) => Box::new(core_api::ReaderStatement::stdin()),
        _ => {
            return Err(core_api::CliError::Usage(
                "pass exactly one of --statement or --stdin".to_string(),
            ))
        }
    };

    if args.dry_run {
        let cases = core_api::build_cases(source.as_mut())?;
        print!("{}", render_cases(&cases));
        return Ok(0);
    }

    let mut layout = cfg.layout.clone();
    if let Some(root) = args.root {
        layout.root = root;
    }
    let store = core_api::FsCaseStore::from_layout(&layout);
    let files = core_api::prepare(source.as_mut(), &store)?;

    println!(
        "Wrote {} test case(s) to {} and {}",
        files.len(),
        store.inputs_dir().display(),
        store.outputs_dir().display()
    );
    Ok(0)
}

pub fn render_cases(cases: &[core_api::CanonicalCase]) -> String {
    let mut out = String::new();
    for case in cases {
        out.push_str(&format!("Example {}\n", case.index));
        out.push_str("Input:\n");
        out.push_str(case.input.as_str());
        out.push_str("\nOutput:\n");
        out.push_str(case.output.as_str());
        out.push_str("\n\n");
    }
    out
}
