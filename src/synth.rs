use crate::eval::GoldLabel;
use crate::triage::{
    find_required_missing_fields, infer_priority, recommend_queue, should_escalate, Channel,
    CustomerTier, DocType, MetaValue, Metadata, Region, TriageInput,
};
use chrono::{DateTime, Duration, Utc};
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum SynthError {
    #[error("failed to write {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to encode corpus row: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SynthSettings {
    pub count: u32,
    pub seed: u64,
    pub edge_rate: f64,
}

impl Default for SynthSettings {
    fn default() -> Self {
        Self {
            count: 200,
            seed: 42,
            edge_rate: 0.30,
        }
    }
}

#[derive(Debug, Clone)]
pub struct GeneratedCase {
    pub sample: TriageInput,
    pub gold: GoldLabel,
}

const DOC_TYPE_WEIGHTS: [(DocType, f64); 5] = [
    (DocType::IncidentReport, 0.28),
    (DocType::AccessRequest, 0.20),
    (DocType::SecurityQuestionnaire, 0.18),
    (DocType::BillingDispute, 0.17),
    (DocType::FeatureRequest, 0.17),
];

const CHANNELS: [Channel; 4] = [
    Channel::Email,
    Channel::Portal,
    Channel::Attachment,
    Channel::Api,
];
const REGIONS: [Region; 4] = [Region::Na, Region::Eu, Region::Apac, Region::Latam];
const TIERS: [CustomerTier; 3] = [
    CustomerTier::Enterprise,
    CustomerTier::Growth,
    CustomerTier::Standard,
];

const INCIDENT_SERVICES: [&str; 4] = [
    "api-gateway",
    "auth-service",
    "billing-service",
    "data-export",
];
const ACCESS_ROLES: [&str; 4] = [
    "admin",
    "billing-admin",
    "security-auditor",
    "support-analyst",
];
const ACCESS_WINDOWS: [&str; 3] = ["overnight migration", "month-end close", "audit prep"];
const SECURITY_FRAMEWORKS: [&str; 4] = ["SOC2", "ISO27001", "HIPAA", "GDPR"];
const BILLING_ISSUES: [&str; 4] = [
    "duplicate charge",
    "invoice mismatch",
    "unexpected overage",
    "tax issue",
];
const FEATURE_AREAS: [&str; 4] = [
    "workflow builder",
    "audit logs",
    "SAML setup",
    "reporting dashboard",
];
const IMPACT_LEVELS: [&str; 3] = ["low", "medium", "high"];

fn weighted_doc_type(rng: &mut StdRng) -> DocType {
    let roll: f64 = rng.random();
    let mut cumulative = 0.0;
    for (doc_type, weight) in DOC_TYPE_WEIGHTS {
        cumulative += weight;
        if roll < cumulative {
            return doc_type;
        }
    }
    DocType::FeatureRequest
}

fn pick<T: Copy>(rng: &mut StdRng, options: &[T]) -> T {
    // Every options slice here is non-empty const data.
    *options.choose(rng).unwrap_or(&options[0])
}

fn doc_type_hint(rng: &mut StdRng, doc_type: DocType, edge_case: bool) -> String {
    let chosen = if edge_case && rng.random::<f64>() < 0.35 {
        let alternatives: Vec<DocType> = DocType::ALL
            .into_iter()
            .filter(|candidate| *candidate != doc_type)
            .collect();
        pick(rng, &alternatives)
    } else {
        doc_type
    };
    chosen.as_str().replace('_', " ")
}

fn maybe_missing_tier(rng: &mut StdRng, edge_case: bool) -> Option<CustomerTier> {
    if edge_case && rng.random::<f64>() < 0.35 {
        return None;
    }
    if rng.random::<f64>() < 0.08 {
        return None;
    }
    Some(pick(rng, &TIERS))
}

fn synth_timestamp(rng: &mut StdRng) -> DateTime<Utc> {
    // Window starts at 2026-01-01T00:00:00Z.
    let base = DateTime::<Utc>::from_timestamp(1_767_225_600, 0).unwrap_or_default();
    base + Duration::days(rng.random_range(0..=45)) + Duration::minutes(rng.random_range(0..1_440))
}

fn build_incident(rng: &mut StdRng, edge_case: bool) -> (String, Metadata) {
    let service = pick(rng, &INCIDENT_SERVICES);
    let region = pick(rng, &REGIONS);
    let latency: i64 = rng.random_range(120..=900);
    let mut content = format!(
        "Production incident: {service} latency spiked to {latency}ms in {region}. \
Customer reports intermittent failures during peak traffic."
    );
    let mut metadata = Metadata::new();
    metadata.insert("service".to_string(), MetaValue::from(service));
    metadata.insert("region".to_string(), MetaValue::from(region.as_str()));
    metadata.insert(
        "has_logs".to_string(),
        MetaValue::from(rng.random::<f64>() > 0.15),
    );
    metadata.insert(
        "request_id_examples".to_string(),
        MetaValue::from("req-1001,req-1002"),
    );

    if edge_case && rng.random::<f64>() < 0.45 {
        metadata.remove("request_id_examples");
        content.push_str(" Unable to attach request IDs yet.");
    }

    (content, metadata)
}

fn build_access_request(rng: &mut StdRng, edge_case: bool) -> (String, Metadata) {
    let role = pick(rng, &ACCESS_ROLES);
    let window = pick(rng, &ACCESS_WINDOWS);
    let mut content = format!(
        "Requesting temporary {role} permissions for external contractor during {window}."
    );
    let mut metadata = Metadata::new();
    metadata.insert("requested_role".to_string(), MetaValue::from(role));
    metadata.insert("temporary_access".to_string(), MetaValue::from(true));
    metadata.insert(
        "justification".to_string(),
        MetaValue::from("operational requirement"),
    );
    metadata.insert(
        "approval_reference".to_string(),
        MetaValue::from(format!("APR-{}", rng.random_range(1000..=9999)).as_str()),
    );

    if edge_case && rng.random::<f64>() < 0.50 {
        metadata.remove("approval_reference");
        content.push_str(" Approver details not included in submission.");
    }

    (content, metadata)
}

fn build_security_questionnaire(rng: &mut StdRng, edge_case: bool) -> (String, Metadata) {
    let framework = pick(rng, &SECURITY_FRAMEWORKS);
    let due_days: i64 = rng.random_range(2..=14);
    // Due dates anchor at 2026-03-01.
    let due_base = DateTime::<Utc>::from_timestamp(1_772_323_200, 0).unwrap_or_default();
    let due_date = (due_base + Duration::days(due_days)).date_naive().to_string();
    let mut content = format!(
        "Customer sent security questionnaire for {framework} review. \
Needs completion before procurement deadline."
    );
    let mut metadata = Metadata::new();
    metadata.insert("framework".to_string(), MetaValue::from(framework));
    metadata.insert(
        "question_count".to_string(),
        MetaValue::from(rng.random_range(20i64..=180)),
    );
    metadata.insert(
        "required_due_date".to_string(),
        MetaValue::from(due_date.as_str()),
    );
    metadata.insert("deadline_days".to_string(), MetaValue::from(due_days));

    if edge_case && rng.random::<f64>() < 0.35 {
        metadata.remove("required_due_date");
        content.push_str(" Submission deadline not clearly stated.");
    }

    (content, metadata)
}

fn build_billing_dispute(rng: &mut StdRng, edge_case: bool) -> (String, Metadata) {
    let issue = pick(rng, &BILLING_ISSUES);
    let amount: i64 = rng.random_range(400..=12_000);
    let mut content = format!(
        "Customer disputes invoice due to {issue}. Disputed amount is approximately ${amount}."
    );
    let mut metadata = Metadata::new();
    metadata.insert("issue_type".to_string(), MetaValue::from(issue));
    metadata.insert("disputed_amount".to_string(), MetaValue::from(amount));
    metadata.insert(
        "invoice_id".to_string(),
        MetaValue::from(format!("INV-{}", rng.random_range(10_000..=99_999)).as_str()),
    );

    if edge_case && rng.random::<f64>() < 0.40 {
        metadata.remove("invoice_id");
        content.push_str(" Invoice identifier not provided in the message.");
    }

    (content, metadata)
}

fn build_feature_request(rng: &mut StdRng, edge_case: bool) -> (String, Metadata) {
    let area = pick(rng, &FEATURE_AREAS);
    let mut content = format!(
        "Feature request: improve {area} for enterprise rollout. \
Current workflow requires too many manual steps."
    );
    let mut metadata = Metadata::new();
    metadata.insert("product_area".to_string(), MetaValue::from(area));
    metadata.insert(
        "customer_impact".to_string(),
        MetaValue::from(pick(rng, &IMPACT_LEVELS)),
    );
    metadata.insert(
        "business_justification".to_string(),
        MetaValue::from("Customer reports measurable efficiency gains if implemented."),
    );

    if edge_case && rng.random::<f64>() < 0.30 {
        metadata.remove("business_justification");
        content.push_str(" Business impact details are currently limited.");
    }

    (content, metadata)
}

fn build_case_fields(rng: &mut StdRng, doc_type: DocType, edge_case: bool) -> (String, Metadata) {
    match doc_type {
        DocType::IncidentReport => build_incident(rng, edge_case),
        DocType::AccessRequest => build_access_request(rng, edge_case),
        DocType::SecurityQuestionnaire => build_security_questionnaire(rng, edge_case),
        DocType::BillingDispute => build_billing_dispute(rng, edge_case),
        DocType::FeatureRequest => build_feature_request(rng, edge_case),
    }
}

fn generate_case(rng: &mut StdRng, index: u32, edge_rate: f64) -> GeneratedCase {
    let doc_type = weighted_doc_type(rng);
    let edge_case = rng.random::<f64>() < edge_rate;

    let customer_id = format!("CUST-{}", rng.random_range(1000..=9999));
    let tier = maybe_missing_tier(rng, edge_case);
    let region = pick(rng, &REGIONS);
    let channel = pick(rng, &CHANNELS);

    let (mut content, metadata) = build_case_fields(rng, doc_type, edge_case);
    if edge_case && rng.random::<f64>() < 0.2 {
        content.push_str(" Also seeing invoice anomalies this week.");
    }

    // Gold labels come from the same policy functions the runners use, so the
    // corpus is consistent with the decision contract by construction.
    let missing_fields = find_required_missing_fields(doc_type, &metadata);
    let (priority, severity) = infer_priority(doc_type, tier, &missing_fields);
    let escalation_reason = should_escalate(doc_type, tier, &missing_fields, priority);

    let doc_id = format!("DOC-{index:04}");
    let sample = TriageInput {
        doc_id: doc_id.clone(),
        channel,
        customer_id,
        customer_tier: tier,
        region,
        submitted_at: synth_timestamp(rng),
        doc_type_hint: Some(doc_type_hint(rng, doc_type, edge_case)),
        content,
        metadata,
    };
    let gold = GoldLabel {
        doc_id,
        true_doc_type: doc_type,
        priority,
        severity_score: severity,
        recommended_queue: recommend_queue(doc_type).to_string(),
        required_missing_fields: missing_fields,
        escalate: escalation_reason.is_some(),
        escalation_reason: escalation_reason.map(str::to_string),
    };

    GeneratedCase { sample, gold }
}

/// Deterministic synthetic corpus: the same seed always yields the same
/// samples and gold labels.
pub fn generate_corpus(settings: &SynthSettings) -> Vec<GeneratedCase> {
    let mut rng = StdRng::seed_from_u64(settings.seed);
    (1..=settings.count)
        .map(|index| generate_case(&mut rng, index, settings.edge_rate))
        .collect()
}

fn write_jsonl<T: serde::Serialize>(path: &Path, rows: &[T]) -> Result<(), SynthError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| SynthError::Io {
            path: parent.display().to_string(),
            source,
        })?;
    }
    let mut file = fs::File::create(path).map_err(|source| SynthError::Io {
        path: path.display().to_string(),
        source,
    })?;
    for row in rows {
        let line = serde_json::to_string(row)?;
        writeln!(file, "{line}").map_err(|source| SynthError::Io {
            path: path.display().to_string(),
            source,
        })?;
    }
    Ok(())
}

/// Write `samples.jsonl` and `gold.jsonl` under `data_dir`, returning their
/// paths.
pub fn write_corpus(
    data_dir: &Path,
    cases: &[GeneratedCase],
) -> Result<(PathBuf, PathBuf), SynthError> {
    let samples: Vec<&TriageInput> = cases.iter().map(|case| &case.sample).collect();
    let gold: Vec<&GoldLabel> = cases.iter().map(|case| &case.gold).collect();

    let samples_path = data_dir.join("samples.jsonl");
    let gold_path = data_dir.join("gold.jsonl");
    write_jsonl(&samples_path, &samples)?;
    write_jsonl(&gold_path, &gold)?;
    Ok((samples_path, gold_path))
}
