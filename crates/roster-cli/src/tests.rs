use super::*;
use crate::analytics::parse_batch_file;
use uuid::Uuid;

#[test]
fn parses_db_ping_command() {
    let cli = Cli::try_parse_from(["roster-cli", "db", "ping"]).expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Some(Commands::Db {
            command: DbCommands::Ping
        })
    ));
}

#[test]
fn parses_db_migrate_command() {
    let cli =
        Cli::try_parse_from(["roster-cli", "db", "migrate"]).expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Some(Commands::Db {
            command: DbCommands::Migrate
        })
    ));
}

#[test]
fn no_command_is_none() {
    let cli = Cli::try_parse_from(["roster-cli"]).expect("expected valid cli args");
    assert!(cli.command.is_none());
}

#[test]
fn parses_analytics_update_with_links() {
    let id = Uuid::new_v4();
    let id_arg = id.to_string();
    let cli = Cli::try_parse_from([
        "roster-cli",
        "analytics",
        "update",
        "--influencer",
        &id_arg,
        "https://www.instagram.com/p/a/",
        "https://youtu.be/b",
    ])
    .expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Some(Commands::Analytics {
            command: AnalyticsCommands::Update { influencer, ref links }
        }) if influencer == id && links.len() == 2
    ));
}

#[test]
fn analytics_update_without_links_is_allowed() {
    let id_arg = Uuid::new_v4().to_string();
    let cli = Cli::try_parse_from(["roster-cli", "analytics", "update", "--influencer", &id_arg])
        .expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Some(Commands::Analytics {
            command: AnalyticsCommands::Update { ref links, .. }
        }) if links.is_empty()
    ));
}

#[test]
fn analytics_update_rejects_malformed_influencer_id() {
    let result = Cli::try_parse_from([
        "roster-cli",
        "analytics",
        "update",
        "--influencer",
        "not-a-uuid",
    ]);
    assert!(result.is_err());
}

#[test]
fn parses_analytics_batch_dry_run() {
    let cli = Cli::try_parse_from([
        "roster-cli",
        "analytics",
        "batch",
        "--file",
        "updates.json",
        "--dry-run",
    ])
    .expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Some(Commands::Analytics {
            command: AnalyticsCommands::Batch { ref file, dry_run: true }
        }) if file.to_str() == Some("updates.json")
    ));
}

#[test]
fn parses_analytics_summary() {
    let id_arg = Uuid::new_v4().to_string();
    let cli = Cli::try_parse_from(["roster-cli", "analytics", "summary", "--influencer", &id_arg])
        .expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Some(Commands::Analytics {
            command: AnalyticsCommands::Summary { .. }
        })
    ));
}

#[test]
fn batch_file_accepts_bare_list_and_wrapped_form() {
    let id = Uuid::new_v4();
    let bare = format!(r#"[{{"influencer_id": "{id}", "content_links": ["https://a"]}}]"#);
    let wrapped = format!(r#"{{"updates": [{{"influencer_id": "{id}"}}]}}"#);

    let updates = parse_batch_file(&bare).expect("bare list");
    assert_eq!(updates.len(), 1);
    assert_eq!(updates[0].influencer_id, id);
    assert_eq!(updates[0].content_links, vec!["https://a".to_string()]);

    let updates = parse_batch_file(&wrapped).expect("wrapped form");
    assert_eq!(updates.len(), 1);
    assert!(updates[0].content_links.is_empty());
}

#[test]
fn batch_file_rejects_garbage() {
    assert!(parse_batch_file("not json").is_err());
    assert!(parse_batch_file(r#"[{"content_links": []}]"#).is_err());
}
