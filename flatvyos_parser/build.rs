// build.rs - compile-time limits from config/<profile>.toml
use std::env;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

#[derive(serde::Deserialize)]
struct Limits {
    lexical: LexicalLimits,
    syntax: SyntaxLimits,
    batch_processing: BatchLimits,
    logging: LoggingLimits,
}

#[derive(serde::Deserialize)]
struct LexicalLimits {
    max_token_count: usize,
    max_token_length: usize,
    max_description_length: usize,
    max_comment_length: usize,
}

#[derive(serde::Deserialize)]
struct SyntaxLimits {
    max_parse_depth: usize,
    max_expression_depth: usize,
    max_error_history: usize,
    max_context_stack_depth: usize,
    max_recovery_scan_tokens: usize,
}

#[derive(serde::Deserialize)]
struct BatchLimits {
    max_worker_threads: usize,
    max_documents_per_batch: usize,
    max_batch_bytes: u64,
}

#[derive(serde::Deserialize)]
struct LoggingLimits {
    max_error_collection: usize,
    log_buffer_size: usize,
    max_log_message_length: usize,
    max_log_events_per_document: usize,
    security_min_log_level: u8,
}

/// (constant name, rust type, value)
type Entry = (&'static str, &'static str, String);

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=FLATVYOS_BUILD_PROFILE");
    println!("cargo:rerun-if-env-changed=FLATVYOS_CONFIG_DIR");

    let profile = env::var("FLATVYOS_BUILD_PROFILE").unwrap_or_else(|_| "development".into());
    let config_dir = env::var("FLATVYOS_CONFIG_DIR").unwrap_or_else(|_| "config".into());

    // config/ sits next to the crate directory, at the workspace root
    let manifest_dir = env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR not set");
    let workspace_root = Path::new(&manifest_dir)
        .parent()
        .expect("crate directory has no parent");
    let path = workspace_root.join(&config_dir).join(format!("{profile}.toml"));
    println!("cargo:rerun-if-changed={}", path.display());

    let text = fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("cannot read limits file {}: {e}", path.display()));
    let limits: Limits = toml::from_str(&text)
        .unwrap_or_else(|e| panic!("invalid limits file {}: {e}", path.display()));

    if let Err(problem) = check(&limits, &profile) {
        panic!("{}: {problem}", path.display());
    }

    let out = Path::new(&env::var("OUT_DIR").expect("OUT_DIR not set")).join("constants.rs");
    fs::write(&out, render(&limits, &profile)).expect("cannot write generated constants");
}

fn check(limits: &Limits, profile: &str) -> Result<(), String> {
    let lexical = &limits.lexical;
    let syntax = &limits.syntax;
    let logging = &limits.logging;

    if lexical.max_token_count > 50_000_000 {
        return Err("lexical.max_token_count above 50M".into());
    }
    if lexical.max_description_length > lexical.max_token_length {
        return Err("lexical.max_description_length exceeds max_token_length".into());
    }
    if syntax.max_expression_depth > syntax.max_parse_depth {
        return Err("syntax.max_expression_depth exceeds max_parse_depth".into());
    }
    if syntax.max_parse_depth == 0 || syntax.max_recovery_scan_tokens == 0 {
        return Err("syntax limits must be non-zero".into());
    }
    if limits.batch_processing.max_worker_threads == 0 {
        return Err("batch_processing.max_worker_threads must be at least 1".into());
    }
    if logging.security_min_log_level > 2 {
        return Err("logging.security_min_log_level must be 0, 1 or 2".into());
    }
    if logging.max_log_events_per_document > logging.log_buffer_size {
        return Err("logging.max_log_events_per_document exceeds log_buffer_size".into());
    }
    if logging.max_log_events_per_document > logging.max_error_collection {
        return Err("logging.max_log_events_per_document exceeds max_error_collection".into());
    }
    if profile == "production" && lexical.max_token_count > 10_000_000 {
        return Err("production max_token_count above 10M".into());
    }
    Ok(())
}

fn render(limits: &Limits, profile: &str) -> String {
    let entry = |name, value: usize| -> Entry { (name, "usize", value.to_string()) };

    let sections: [(&str, Vec<Entry>); 4] = [
        ("lexical", vec![
            entry("MAX_TOKEN_COUNT", limits.lexical.max_token_count),
            entry("MAX_TOKEN_LENGTH", limits.lexical.max_token_length),
            entry("MAX_DESCRIPTION_LENGTH", limits.lexical.max_description_length),
            entry("MAX_COMMENT_LENGTH", limits.lexical.max_comment_length),
        ]),
        ("syntax", vec![
            entry("MAX_PARSE_DEPTH", limits.syntax.max_parse_depth),
            entry("MAX_EXPRESSION_DEPTH", limits.syntax.max_expression_depth),
            entry("MAX_ERROR_HISTORY", limits.syntax.max_error_history),
            entry("MAX_CONTEXT_STACK_DEPTH", limits.syntax.max_context_stack_depth),
            entry("MAX_RECOVERY_SCAN_TOKENS", limits.syntax.max_recovery_scan_tokens),
        ]),
        ("batch_processing", vec![
            entry("MAX_WORKER_THREADS", limits.batch_processing.max_worker_threads),
            entry("MAX_DOCUMENTS_PER_BATCH", limits.batch_processing.max_documents_per_batch),
            ("MAX_BATCH_BYTES", "u64", limits.batch_processing.max_batch_bytes.to_string()),
        ]),
        ("logging", vec![
            entry("MAX_ERROR_COLLECTION", limits.logging.max_error_collection),
            entry("LOG_BUFFER_SIZE", limits.logging.log_buffer_size),
            entry("MAX_LOG_MESSAGE_LENGTH", limits.logging.max_log_message_length),
            entry("MAX_LOG_EVENTS_PER_DOCUMENT", limits.logging.max_log_events_per_document),
            ("SECURITY_MIN_LOG_LEVEL", "u8", limits.logging.security_min_log_level.to_string()),
        ]),
    ];

    let mut code = format!("// Generated by build.rs from the `{profile}` limits file. Do not edit.\n\n");
    code.push_str("pub mod compile_time {\n");
    for (section, entries) in &sections {
        let _ = writeln!(code, "    pub mod {section} {{");
        for (name, ty, value) in entries {
            let _ = writeln!(code, "        pub const {name}: {ty} = {value};");
        }
        code.push_str("    }\n");
    }
    code.push_str("}\n");
    code
}
