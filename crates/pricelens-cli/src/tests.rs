use clap::Parser;

use super::*;

#[test]
fn parses_lookup_command() {
    let cli = Cli::try_parse_from(["pricelens", "lookup", "--image", "shoe.jpg"])
        .expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Commands::Lookup { ref image, table: false } if image == &PathBuf::from("shoe.jpg")
    ));
}

#[test]
fn parses_resolve_with_repeated_urls() {
    let cli = Cli::try_parse_from([
        "pricelens",
        "resolve",
        "--label",
        "red kurta",
        "--url",
        "https://www.flipkart.com/p/1",
        "--url",
        "https://www.myntra.com/2",
        "--table",
    ])
    .expect("expected valid cli args");

    let Commands::Resolve { label, urls, table } = cli.command else {
        panic!("expected resolve command");
    };
    assert_eq!(label.as_deref(), Some("red kurta"));
    assert_eq!(
        urls,
        vec!["https://www.flipkart.com/p/1", "https://www.myntra.com/2"]
    );
    assert!(table);
}

#[test]
fn resolve_without_arguments_is_valid() {
    let cli = Cli::try_parse_from(["pricelens", "resolve"]).expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Commands::Resolve { label: None, ref urls, table: false } if urls.is_empty()
    ));
}

#[test]
fn price_requires_url() {
    assert!(Cli::try_parse_from(["pricelens", "price"]).is_err());
}

#[test]
fn parses_classify_command() {
    let cli = Cli::try_parse_from(["pricelens", "classify", "--url", "https://www.croma.com/p/1"])
        .expect("expected valid cli args");
    assert!(matches!(cli.command, Commands::Classify { ref url } if url == "https://www.croma.com/p/1"));
}

#[test]
fn missing_subcommand_is_an_error() {
    assert!(Cli::try_parse_from(["pricelens"]).is_err());
}
