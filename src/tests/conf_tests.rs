use super::{
    parse_directive_line, parse_kv_line, read_config_text, rewrite_directive, unquote,
    write_config_text, DirectiveStyle,
};
use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

#[test]
fn kv_line_splits_key_and_value() {
    assert_eq!(parse_kv_line("port = 3306"), Some(("port", "3306")));
    assert_eq!(parse_kv_line("  bind-address=127.0.0.1  "), Some(("bind-address", "127.0.0.1")));
}

#[test]
fn kv_line_strips_inline_comment() {
    assert_eq!(parse_kv_line("port = 5432 # cluster default"), Some(("port", "5432")));
}

#[test]
fn kv_line_skips_comments_blanks_and_sections() {
    assert_eq!(parse_kv_line("# port = 9"), None);
    assert_eq!(parse_kv_line("; port = 9"), None);
    assert_eq!(parse_kv_line("[mysqld]"), None);
    assert_eq!(parse_kv_line("   "), None);
}

#[test]
fn directive_line_splits_on_first_whitespace() {
    assert_eq!(parse_directive_line("port 6379"), Some(("port", "6379")));
    assert_eq!(parse_directive_line("bind 127.0.0.1 ::1"), Some(("bind", "127.0.0.1 ::1")));
    assert_eq!(parse_directive_line("# requirepass x"), None);
}

#[test]
fn directive_line_without_argument_yields_empty_value() {
    assert_eq!(parse_directive_line("requirepass"), Some(("requirepass", "")));
}

#[test]
fn unquote_strips_matching_single_quotes() {
    assert_eq!(unquote("'5433'"), "5433");
    assert_eq!(unquote("5433"), "5433");
    assert_eq!(unquote("'unbalanced"), "'unbalanced");
}

#[test]
fn rewrite_replaces_live_assignment_in_place() {
    let text = "# settings\nport = 3306\nbind-address = 0.0.0.0\n";
    let updated = rewrite_directive(text, "port", "3307", DirectiveStyle::Equals);
    assert_eq!(updated, "# settings\nport = 3307\nbind-address = 0.0.0.0\n");
}

#[test]
fn rewrite_drops_duplicate_assignments() {
    let text = "port = 1\nport = 2\n";
    let updated = rewrite_directive(text, "port", "9", DirectiveStyle::Equals);
    assert_eq!(updated, "port = 9\n");
}

#[test]
fn rewrite_appends_when_key_is_absent() {
    let text = "# only comments here\n";
    let updated = rewrite_directive(text, "port", "8080", DirectiveStyle::Equals);
    assert_eq!(updated, "# only comments here\nport = 8080\n");
}

#[test]
fn rewrite_leaves_commented_assignment_untouched() {
    let text = "# port = 3306\nport = 3306\n";
    let updated = rewrite_directive(text, "port", "3307", DirectiveStyle::Equals);
    assert_eq!(updated, "# port = 3306\nport = 3307\n");
}

#[test]
fn rewrite_space_style_matches_redis_directives() {
    let text = "bind 127.0.0.1\nport 6379\n";
    let updated = rewrite_directive(text, "port", "6380", DirectiveStyle::Space);
    assert_eq!(updated, "bind 127.0.0.1\nport 6380\n");
}

#[test]
fn write_then_read_roundtrips_and_cleans_temp() {
    let dir = temp_dir("roundtrip");
    fs::create_dir_all(&dir).expect("mkdir");
    let target = dir.join("service.conf");
    write_config_text(&target, "port = 1\n").expect("write");
    assert_eq!(read_config_text(&target).expect("read"), "port = 1\n");

    write_config_text(&target, "port = 2\n").expect("rewrite");
    assert_eq!(read_config_text(&target).expect("reread"), "port = 2\n");

    let leftovers = fs::read_dir(&dir)
        .expect("list")
        .flatten()
        .filter(|entry| entry.file_name().to_string_lossy().contains("steward-tmp"))
        .count();
    assert_eq!(leftovers, 0);
}

#[test]
fn read_missing_file_reports_the_path() {
    let missing = temp_dir("missing").join("nope.conf");
    let error = read_config_text(&missing).expect_err("should fail");
    assert!(error.to_string().contains("nope.conf"));
}

fn temp_dir(name: &str) -> PathBuf {
    let ts = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("time")
        .as_nanos();
    std::env::temp_dir().join(format!("steward-conf-{name}-{ts}"))
}
