use cpjudge_core::api as core_api;

pub fn render_languages(registry: &core_api::LanguageRegistry) -> String {
    let mut out = String::new();
    for lang in registry.languages() {
        let mode = match lang.build {
            Some(build) => format!("compiled ({})", build.program),
            None => format!("interpreted ({})", lang.run.program),
        };
        out.push_str(&format!(
            "{:<8} .{:<4} {:<22} aliases: {}\n",
            lang.name,
            lang.file_extension,
            mode,
            lang.aliases.join(", ")
        ));
    }
    out
}

pub fn handle_languages() -> Result<i32, core_api::CliError> {
    print!("{}", render_languages(&core_api::LanguageRegistry::builtin()));
    Ok(0)
}
