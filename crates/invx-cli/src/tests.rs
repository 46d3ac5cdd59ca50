use super::*;

fn sample_result() -> ProcessingResult {
    serde_json::from_value(serde_json::json!({
        "success": true,
        "summary": {
            "collectionId": "dynamic-invoices",
            "totalInvoices": 1,
            "successfulInvoices": 1,
            "failedInvoices": 0,
            "totalFields": 1,
            "validFields": 1,
            "verificationNeededFields": 0,
            "missingFields": 0,
            "overallStatus": "Valid",
            "timestamp": "2024-01-15T10:00:00Z"
        },
        "invoices": [{
            "id": "inv-001",
            "fileName": "a.pdf",
            "vendorName": "Acme",
            "invoiceNumber": "",
            "amount": "",
            "status": "success",
            "detectedTemplate": "Standard Invoice",
            "fields": [{
                "fieldName": "vendorName",
                "value": { "value": "Acme", "format": "Text" },
                "validationState": "Valid"
            }]
        }]
    }))
    .expect("valid results json")
}

#[test]
fn no_command_is_none() {
    let cli = Cli::try_parse_from(["invx-cli"]).expect("expected valid cli args");
    assert!(cli.command.is_none());
    assert_eq!(cli.server_url, "http://127.0.0.1:3000");
}

#[test]
fn parses_list_with_server_url() {
    let cli = Cli::try_parse_from(["invx-cli", "list", "--server-url", "http://demo:8080"])
        .expect("expected valid cli args");
    assert!(matches!(cli.command, Some(Commands::List)));
    assert_eq!(cli.server_url, "http://demo:8080");
}

#[test]
fn parses_preview_filename() {
    let cli = Cli::try_parse_from(["invx-cli", "preview", "Corporate Green Invoice Template.pdf"])
        .expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Some(Commands::Preview { ref filename }) if filename == "Corporate Green Invoice Template.pdf"
    ));
}

#[test]
fn preview_requires_filename() {
    assert!(Cli::try_parse_from(["invx-cli", "preview"]).is_err());
}

#[test]
fn process_defaults() {
    let cli = Cli::try_parse_from(["invx-cli", "process"]).expect("expected valid cli args");
    match cli.command {
        Some(Commands::Process {
            collection_id,
            output,
            json,
            no_animation,
            speed,
        }) => {
            assert_eq!(collection_id, "dynamic-invoices");
            assert!(output.is_none());
            assert!(!json);
            assert!(!no_animation);
            assert!((speed - 1.0).abs() < f64::EPSILON);
        }
        other => panic!("expected process command, got {other:?}"),
    }
}

#[test]
fn process_output_flag_without_value_uses_default_file() {
    let cli = Cli::try_parse_from(["invx-cli", "process", "--output", "--no-animation"])
        .expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Some(Commands::Process { output: Some(ref p), no_animation: true, .. })
            if p == Path::new(DEFAULT_RESULTS_FILE)
    ));
}

#[test]
fn process_accepts_all_flags() {
    let cli = Cli::try_parse_from([
        "invx-cli",
        "process",
        "--collection-id",
        "sample-invoices",
        "--output",
        "out.json",
        "--json",
        "--speed",
        "4",
    ])
    .expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Some(Commands::Process { ref collection_id, output: Some(ref p), json: true, .. })
            if collection_id == "sample-invoices" && p == Path::new("out.json")
    ));
}

#[test]
fn parses_report_file() {
    let cli = Cli::try_parse_from(["invx-cli", "report", "results.json"])
        .expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Some(Commands::Report { ref file }) if file == Path::new("results.json")
    ));
}

#[test]
fn retry_hints_name_the_command() {
    assert_eq!(Commands::List.retry_hint(), "invx-cli list");
    assert_eq!(
        Commands::Report {
            file: PathBuf::from("x.json")
        }
        .retry_hint(),
        "invx-cli report <file>"
    );
}

#[test]
fn saved_results_load_back_verbatim() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join(DEFAULT_RESULTS_FILE);
    let result = sample_result();

    save_results(&path, &result).expect("save");
    let raw = std::fs::read_to_string(&path).expect("read");
    assert!(raw.contains("\n  \"success\": true"), "expected pretty JSON");
    assert!(raw.contains("\"status\": \"completed\""));

    let loaded = load_results(&path).expect("load");
    assert_eq!(loaded, result);
}

#[test]
fn load_results_rejects_other_json() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("other.json");
    std::fs::write(&path, r#"{"hello":"world"}"#).expect("write");

    let err = load_results(&path).unwrap_err();
    assert!(err.to_string().contains("is not a processing results file"));
}

#[tokio::test]
async fn process_without_animation_returns_server_result() {
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/process-invoices"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&sample_result()))
        .expect(1)
        .mount(&server)
        .await;

    let client = ServerClient::new(&server.uri()).expect("client");
    let result = process(&client, "dynamic-invoices", None)
        .await
        .expect("process");
    assert_eq!(result.invoices.len(), 1);
    assert!(result.invoices[0].is_completed());
}

#[tokio::test]
async fn animated_process_lists_before_posting() {
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/invoices"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "success": true,
            "invoices": [{ "id": "inv-001", "filename": "a.pdf", "status": "pending" }]
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/process-invoices"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&sample_result()))
        .expect(1)
        .mount(&server)
        .await;

    let client = ServerClient::new(&server.uri()).expect("client");
    let result = process(&client, "dynamic-invoices", Some(Pacing::new(1000.0)))
        .await
        .expect("process");
    assert_eq!(result.summary.successful_invoices, 1);
}
