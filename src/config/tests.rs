use super::*;

#[test]
fn defaults_resolve_without_any_source() {
    let settings = Settings::from_raw(RawSettings::default()).expect("valid settings");

    assert_eq!(settings.server.addr.port(), DEFAULT_PORT);
    assert_eq!(settings.render.max_depth.get(), 32);
    assert!(!settings.render.escape_code_blocks);
    assert!(settings.render.sanitize);
    assert!(settings.content_api.base_url.is_none());
    assert!(settings.database.url.is_none());
    assert_eq!(settings.site.timezone, Tz::UTC);
    assert_eq!(settings.site.date_format, DEFAULT_DATE_FORMAT);
}

#[test]
fn cli_overrides_take_highest_precedence() {
    let mut raw = RawSettings::default();
    raw.server.port = Some(4000);
    raw.logging.level = Some("info".to_string());

    let overrides = ServeOverrides {
        server_port: Some(4321),
        log_level: Some("debug".to_string()),
        content_api_url: Some("https://functions.example.net".to_string()),
        ..Default::default()
    };

    raw.apply_serve_overrides(&overrides);
    let settings = Settings::from_raw(raw).expect("valid settings");

    assert_eq!(settings.server.addr.port(), 4321);
    assert_eq!(settings.logging.level, LevelFilter::DEBUG);
    assert_eq!(
        settings.content_api.base_url.map(|url| url.to_string()),
        Some("https://functions.example.net/".to_string())
    );
}

#[test]
fn cli_json_logging_enforces_format() {
    let mut raw = RawSettings::default();
    let overrides = ServeOverrides {
        log_json: Some(true),
        ..Default::default()
    };

    raw.apply_serve_overrides(&overrides);
    let settings = Settings::from_raw(raw).expect("valid settings");

    assert!(matches!(settings.logging.format, LogFormat::Json));
}

#[test]
fn zero_render_depth_is_rejected() {
    let mut raw = RawSettings::default();
    raw.render.max_depth = Some(0);

    let err = Settings::from_raw(raw).expect_err("zero depth must fail");
    assert!(matches!(
        err,
        LoadError::Invalid {
            key: "render.max_depth",
            ..
        }
    ));
}

#[test]
fn blank_database_url_is_treated_as_unset() {
    let mut raw = RawSettings::default();
    raw.database.url = Some("   ".to_string());

    let settings = Settings::from_raw(raw).expect("valid settings");
    assert!(settings.database.url.is_none());
}

#[test]
fn unknown_timezone_is_rejected() {
    let mut raw = RawSettings::default();
    raw.site.timezone = Some("Mars/Olympus_Mons".to_string());

    let err = Settings::from_raw(raw).expect_err("invalid timezone");
    assert!(matches!(
        err,
        LoadError::Invalid {
            key: "site.timezone",
            ..
        }
    ));
}

#[test]
fn render_command_can_disable_sanitizer() {
    let args = CliArgs::parse_from(["tintero", "render", "--no-sanitize", "blocks.json"]);
    let mut raw = RawSettings::default();

    match args.command.expect("render command") {
        Command::Render(render) => {
            assert_eq!(render.file, std::path::Path::new("blocks.json"));
            raw.apply_render_overrides(&render);
        }
        _ => panic!("wrong command parsed"),
    }

    let settings = Settings::from_raw(raw).expect("valid settings");
    assert!(!settings.render.sanitize);
}

#[test]
fn default_to_serve_command() {
    let args = CliArgs::parse_from(["tintero"]);
    let command = args
        .command
        .unwrap_or(Command::Serve(Box::<ServeArgs>::default()));
    assert!(matches!(command, Command::Serve(_)));
}

#[test]
fn parse_serve_overrides() {
    let args = CliArgs::parse_from([
        "tintero",
        "serve",
        "--server-host",
        "0.0.0.0",
        "--database-url",
        "postgres://override",
        "--render-max-depth",
        "4",
    ]);

    match args.command.expect("serve command") {
        Command::Serve(serve) => {
            assert_eq!(serve.overrides.server_host.as_deref(), Some("0.0.0.0"));
            assert_eq!(
                serve.overrides.database_url.as_deref(),
                Some("postgres://override")
            );
            assert_eq!(serve.overrides.render_max_depth, Some(4));
        }
        _ => panic!("wrong command parsed"),
    }
}
