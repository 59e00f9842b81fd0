use super::{render_listing, ToolkitCatalog};
use crate::config::{ConfigError, UserCommand};
use crate::ui::PlainRenderer;
use std::collections::HashSet;

fn user_command(id: &str, category: &str) -> UserCommand {
    UserCommand {
        id: id.to_owned(),
        name: format!("Run {id}"),
        description: String::new(),
        command: format!("/usr/local/bin/{id}.sh"),
        category: category.to_owned(),
    }
}

#[test]
fn builtin_ids_are_unique() {
    let catalog = ToolkitCatalog::builtin();
    let ids: Vec<&str> = catalog.iter().map(|(_, cmd)| cmd.id.as_str()).collect();
    let unique: HashSet<&&str> = ids.iter().collect();
    assert_eq!(ids.len(), unique.len());
}

#[test]
fn categories_keep_declaration_order() {
    let catalog = ToolkitCatalog::builtin();
    assert_eq!(
        catalog.category_names(),
        vec!["logs", "permissions", "security", "services", "disk"]
    );
}

#[test]
fn find_locates_a_builtin_by_id() {
    let catalog = ToolkitCatalog::builtin();
    let command = catalog.find("disk-usage").expect("disk-usage");
    assert_eq!(command.command, "df -h");
    assert!(catalog.find("no-such-id").is_none());
}

#[test]
fn request_carries_the_command_line_and_name() {
    let catalog = ToolkitCatalog::builtin();
    let request = catalog.find("failed-units").expect("failed-units").request();
    assert_eq!(request.command, "systemctl --failed --no-pager");
    assert_eq!(request.description, "Failed units");
}

#[test]
fn user_commands_land_after_the_builtin_categories() {
    let catalog =
        ToolkitCatalog::with_user_commands(&[user_command("deploy", "releases")]).expect("catalog");
    assert_eq!(catalog.category_count(), 6);
    let (name, commands) = catalog.category_at(5).expect("last category");
    assert_eq!(name, "releases");
    assert_eq!(commands[0].id, "deploy");
}

#[test]
fn user_commands_may_extend_a_builtin_category() {
    let catalog =
        ToolkitCatalog::with_user_commands(&[user_command("zpool-status", "disk")]).expect("catalog");
    assert_eq!(catalog.category_count(), 5);
    assert!(catalog.find("zpool-status").is_some());
}

#[test]
fn clashing_user_ids_are_rejected() {
    let error = ToolkitCatalog::with_user_commands(&[user_command("disk-usage", "custom")])
        .expect_err("should clash");
    assert!(matches!(error, ConfigError::DuplicateCommandId { .. }));
}

#[test]
fn listing_narrows_to_one_category() {
    let catalog = ToolkitCatalog::builtin();
    let mut renderer = PlainRenderer::new(Vec::new(), false);
    let matched = render_listing(&catalog, Some("disk"), &mut renderer).expect("render");
    assert!(matched);
    let output = String::from_utf8(renderer.into_inner()).expect("utf8");
    assert!(output.contains("disk-usage"));
    assert!(!output.contains("journal-tail"));
}

#[test]
fn listing_an_unknown_category_suggests_the_names() {
    let catalog = ToolkitCatalog::builtin();
    let mut renderer = PlainRenderer::new(Vec::new(), false);
    let matched = render_listing(&catalog, Some("nope"), &mut renderer).expect("render");
    assert!(!matched);
    let output = String::from_utf8(renderer.into_inner()).expect("utf8");
    assert!(output.contains("no such category: nope"));
    assert!(output.contains("logs"));
}
