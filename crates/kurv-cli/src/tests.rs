use super::*;

#[test]
fn parses_normalize_command() {
    let cli = Cli::try_parse_from(["kurv", "normalize", "--retailer", "kiwi", "records.json"])
        .expect("expected valid cli args");

    match cli.command {
        Commands::Normalize { retailer, file } => {
            assert_eq!(retailer, "kiwi");
            assert_eq!(file, PathBuf::from("records.json"));
        }
        other => panic!("expected Normalize, got {other:?}"),
    }
}

#[test]
fn normalize_requires_retailer() {
    assert!(Cli::try_parse_from(["kurv", "normalize", "records.json"]).is_err());
}

#[test]
fn parses_fetch_without_options() {
    let cli = Cli::try_parse_from(["kurv", "fetch"]).expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Commands::Fetch {
            query: None,
            catalog: None
        }
    ));
}

#[test]
fn parses_fetch_with_query_and_catalog() {
    let cli = Cli::try_parse_from([
        "kurv",
        "fetch",
        "--query",
        "melk",
        "--catalog",
        "out/catalog.json",
    ])
    .expect("expected valid cli args");

    match cli.command {
        Commands::Fetch { query, catalog } => {
            assert_eq!(query.as_deref(), Some("melk"));
            assert_eq!(catalog, Some(PathBuf::from("out/catalog.json")));
        }
        other => panic!("expected Fetch, got {other:?}"),
    }
}

#[test]
fn parses_list_add_with_defaults() {
    let cli = Cli::try_parse_from(["kurv", "list", "add", "Lettmelk"]).unwrap();
    assert!(matches!(
        cli.command,
        Commands::List {
            command: ListCommands::Add {
                ref name,
                barcode: None,
                qty: 1
            }
        } if name == "Lettmelk"
    ));
}

#[test]
fn list_add_rejects_zero_quantity() {
    assert!(Cli::try_parse_from(["kurv", "list", "add", "Egg", "--qty", "0"]).is_err());
}

#[test]
fn parses_list_qty_zero() {
    let cli = Cli::try_parse_from(["kurv", "list", "qty", "Egg", "0"]).unwrap();
    assert!(matches!(
        cli.command,
        Commands::List {
            command: ListCommands::Qty { quantity: 0, .. }
        }
    ));
}

#[test]
fn parses_list_clear_checked() {
    let cli = Cli::try_parse_from(["kurv", "list", "clear", "--checked"]).unwrap();
    assert!(matches!(
        cli.command,
        Commands::List {
            command: ListCommands::Clear { checked: true }
        }
    ));
}

#[test]
fn compare_requires_catalog() {
    assert!(Cli::try_parse_from(["kurv", "compare"]).is_err());
    let cli = Cli::try_parse_from(["kurv", "compare", "--catalog", "c.json"]).unwrap();
    assert!(matches!(cli.command, Commands::Compare { .. }));
}

#[test]
fn missing_subcommand_is_an_error() {
    assert!(Cli::try_parse_from(["kurv"]).is_err());
}
