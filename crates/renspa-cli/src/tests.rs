use std::path::PathBuf;

use super::*;

#[test]
fn no_command_is_none() {
    let cli = Cli::try_parse_from(["renspa"]).expect("expected valid cli args");
    assert!(cli.command.is_none());
}

#[test]
fn parses_cuit_with_defaults() {
    let cli = Cli::try_parse_from(["renspa", "cuit", "30-65425756-2", "20123456783"])
        .expect("expected valid cli args");
    match cli.command {
        Some(Commands::Cuit {
            ids,
            file,
            include_historical,
            export,
            format,
        }) => {
            assert_eq!(ids, vec!["30-65425756-2", "20123456783"]);
            assert!(file.is_none());
            assert!(!include_historical);
            assert!(export.is_none());
            assert!(format.is_none());
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn parses_cuit_with_export_and_format() {
    let cli = Cli::try_parse_from([
        "renspa",
        "cuit",
        "30654257562",
        "--include-historical",
        "--export",
        "campos.out",
        "--format",
        "kmz",
    ])
    .expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Some(Commands::Cuit {
            include_historical: true,
            format: Some(ExportFormat::Kmz),
            export: Some(_),
            ..
        })
    ));
}

#[test]
fn rejects_unknown_format() {
    let result = Cli::try_parse_from([
        "renspa", "cuit", "30654257562", "--export", "x.shp", "--format", "shp",
    ]);
    assert!(result.is_err());
}

#[test]
fn format_requires_export_path() {
    let result = Cli::try_parse_from(["renspa", "cuit", "30654257562", "--format", "kml"]);
    assert!(result.is_err());
}

#[test]
fn parses_renspa_lookup_with_file() {
    let cli = Cli::try_parse_from(["renspa", "renspa", "--file", "ids.txt"])
        .expect("expected valid cli args");
    match cli.command {
        Some(Commands::Renspa { ids, file, .. }) => {
            assert!(ids.is_empty());
            assert_eq!(file, Some(PathBuf::from("ids.txt")));
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn parses_timeline_with_output() {
    let cli = Cli::try_parse_from([
        "renspa",
        "timeline",
        "30654257562",
        "--output",
        "serie.csv",
    ])
    .expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Some(Commands::Timeline { output: Some(ref p), .. }) if p == &PathBuf::from("serie.csv")
    ));
}

#[test]
fn timeline_has_no_export_flag() {
    let result = Cli::try_parse_from(["renspa", "timeline", "30654257562", "--export", "x.kml"]);
    assert!(result.is_err());
}
