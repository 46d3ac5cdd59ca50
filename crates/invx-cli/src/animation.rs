//! Synthetic processing log shown while the real processing request is in
//! flight. Only the file names are real; templates and field counts are
//! guessed from the names and every delay is fixed.

use std::ops::Range;
use std::time::Duration;

/// Filename fragments mapped to the template the log claims was detected.
/// The first fragment contained in the name wins.
const TEMPLATE_HINTS: [(&str, &str); 11] = [
    ("invoice", "Standard Invoice"),
    ("tech-solutions", "Standard Invoice"),
    ("marketing", "Standard Invoice"),
    ("office-supplies", "Receipt"),
    ("cloud-services", "Standard Invoice"),
    ("consulting", "Service Invoice"),
    ("print", "Receipt"),
    ("facilities", "Service Invoice"),
    ("software", "Standard Invoice"),
    ("catering", "Receipt"),
    ("transport", "Standard Invoice"),
];

/// One log line and the pause that follows it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct LogStep {
    pub(crate) message: String,
    pub(crate) delay: Duration,
}

impl LogStep {
    fn new(message: impl Into<String>, delay_ms: u64) -> Self {
        Self {
            message: message.into(),
            delay: Duration::from_millis(delay_ms),
        }
    }
}

/// Playback speed; `2.0` halves every delay.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Pacing {
    speed: f64,
}

impl Pacing {
    pub(crate) fn new(speed: f64) -> Self {
        Self { speed }
    }

    fn scale(self, delay: Duration) -> Duration {
        if self.speed.is_finite() && self.speed > 0.0 {
            Duration::try_from_secs_f64(delay.as_secs_f64() / self.speed).unwrap_or(Duration::MAX)
        } else {
            Duration::ZERO
        }
    }
}

pub(crate) fn template_for(filename: &str) -> &'static str {
    TEMPLATE_HINTS
        .iter()
        .find(|(fragment, _)| filename.contains(fragment))
        .map_or("Standard Invoice", |(_, template)| *template)
}

/// Plausible number of extracted fields for the kind of document the name suggests.
pub(crate) fn field_count_range(filename: &str) -> Range<u32> {
    if ["receipt", "print", "catering"]
        .iter()
        .any(|k| filename.contains(k))
    {
        7..10
    } else if ["service", "consulting", "facilities"]
        .iter()
        .any(|k| filename.contains(k))
    {
        8..11
    } else {
        10..14
    }
}

/// Discovery lines printed once the real file list is known.
pub(crate) fn discovery_script(documents: &[String]) -> Vec<LogStep> {
    let mut steps = vec![LogStep::new(
        format!("✅ Found {} invoice files:", documents.len()),
        0,
    )];
    steps.extend(
        documents
            .iter()
            .map(|doc| LogStep::new(format!("   📄 {doc}"), 0)),
    );
    if let Some(last) = steps.last_mut() {
        last.delay = Duration::from_millis(1000);
    }
    steps
}

/// Template registration and file loading, played before the request starts.
pub(crate) fn setup_script(document_count: usize) -> Vec<LogStep> {
    vec![
        LogStep::new("🔧 Registering invoice templates...", 1000),
        LogStep::new("✅ Invoice templates registered successfully", 0),
        LogStep::new(
            format!("📥 Pre-loading all {document_count} invoice files..."),
            800,
        ),
        LogStep::new(
            format!(
                "📦 File loading completed: {document_count}/{document_count} invoices loaded successfully"
            ),
            0,
        ),
    ]
}

/// The four lines shown for one document.
pub(crate) fn document_script(document: &str, field_count: u32) -> Vec<LogStep> {
    let template = template_for(document);
    vec![
        LogStep::new(format!("🚀 Processing {document}..."), 800),
        LogStep::new(format!("📡 API response for {document}: 200 OK"), 300),
        LogStep::new(
            format!(
                "✅ API success for {document}: {{ detectedTemplate: '{template}', fieldsCount: {field_count}, hasFields: true }}"
            ),
            400,
        ),
        LogStep::new(format!("✅ Successfully processed {document}"), 500),
    ]
}

/// Script for every document, with a random field count per document.
pub(crate) fn processing_script(documents: &[String]) -> Vec<LogStep> {
    documents
        .iter()
        .flat_map(|doc| document_script(doc, rand::random_range(field_count_range(doc))))
        .collect()
}

/// Prints each step and waits for its (scaled) delay.
pub(crate) async fn play(steps: &[LogStep], pacing: Pacing) {
    for step in steps {
        println!("{}", step.message);
        let delay = pacing.scale(step.delay);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}
