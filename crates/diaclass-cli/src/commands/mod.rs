//! CLI commands implementation

use anyhow::{Context, Result};
use clap::Args;
use diaclass_core::{Decision, ModelMetadata, PatientProfile};
use serde::Deserialize;
use std::path::PathBuf;
use tracing::debug;

/// API client for communicating with the service
pub struct ApiClient {
    base_url: String,
    client: reqwest::Client,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim().trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Health response from API
#[derive(Debug, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub model_loaded: bool,
}

/// Error body from API
#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    pub detail: String,
}

/// Patient profile given as flags, or as a JSON file with `--input`
#[derive(Args, Debug)]
pub struct AssessArgs {
    /// Read the whole profile from a JSON file instead of flags
    #[arg(long)]
    pub input: Option<PathBuf>,

    /// High blood pressure (0/1)
    #[arg(long, default_value_t = 0, value_parser = clap::value_parser!(u8).range(0..=1))]
    pub high_bp: u8,

    /// High cholesterol (0/1)
    #[arg(long, default_value_t = 0, value_parser = clap::value_parser!(u8).range(0..=1))]
    pub high_chol: u8,

    /// Cholesterol checked in the last 5 years (0/1)
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u8).range(0..=1))]
    pub chol_check: u8,

    /// History of stroke (0/1)
    #[arg(long, default_value_t = 0, value_parser = clap::value_parser!(u8).range(0..=1))]
    pub stroke: u8,

    /// Heart disease or attack (0/1)
    #[arg(long, default_value_t = 0, value_parser = clap::value_parser!(u8).range(0..=1))]
    pub heart_disease: u8,

    /// Serious difficulty walking (0/1)
    #[arg(long, default_value_t = 0, value_parser = clap::value_parser!(u8).range(0..=1))]
    pub diff_walk: u8,

    /// Smoker (0/1)
    #[arg(long, default_value_t = 0, value_parser = clap::value_parser!(u8).range(0..=1))]
    pub smoker: u8,

    /// Heavy alcohol consumption (0/1)
    #[arg(long, default_value_t = 0, value_parser = clap::value_parser!(u8).range(0..=1))]
    pub hvy_alcohol: u8,

    /// Physical activity in the past 30 days (0/1)
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u8).range(0..=1))]
    pub phys_activity: u8,

    /// General health rating (1 excellent ... 5 poor)
    #[arg(long, default_value_t = 3, value_parser = clap::value_parser!(u8).range(1..=5))]
    pub gen_hlth: u8,

    /// Days of poor mental health in the last 30
    #[arg(long, default_value_t = 0, value_parser = clap::value_parser!(u8).range(0..=30))]
    pub ment_hlth: u8,

    /// Days of poor physical health in the last 30
    #[arg(long, default_value_t = 0, value_parser = clap::value_parser!(u8).range(0..=30))]
    pub phys_hlth: u8,

    /// Body mass index (10-70)
    #[arg(long, default_value_t = 25.0, value_parser = parse_bmi)]
    pub bmi: f64,

    /// Sex (0 female, 1 male)
    #[arg(long, default_value_t = 0, value_parser = clap::value_parser!(u8).range(0..=1))]
    pub sex: u8,

    /// Age group category (1 = 18-24 ... 13 = 80+)
    #[arg(long, default_value_t = 5, value_parser = clap::value_parser!(u8).range(1..=13))]
    pub age: u8,

    /// Education level (1-6)
    #[arg(long, default_value_t = 4, value_parser = clap::value_parser!(u8).range(1..=6))]
    pub education: u8,

    /// Income level (1-8)
    #[arg(long, default_value_t = 5, value_parser = clap::value_parser!(u8).range(1..=8))]
    pub income: u8,
}

fn parse_bmi(s: &str) -> Result<f64, String> {
    let value: f64 = s.parse().map_err(|_| format!("'{}' is not a number", s))?;
    if !(10.0..=70.0).contains(&value) {
        return Err(format!("BMI must be between 10 and 70, got {}", value));
    }
    Ok(value)
}

impl AssessArgs {
    /// Profile from the flags
    pub fn to_profile(&self) -> PatientProfile {
        PatientProfile {
            high_bp: f64::from(self.high_bp),
            high_chol: f64::from(self.high_chol),
            diff_walk: f64::from(self.diff_walk),
            heart_disease_or_attack: f64::from(self.heart_disease),
            phys_activity: f64::from(self.phys_activity),
            hvy_alcohol_consump: f64::from(self.hvy_alcohol),
            chol_check: f64::from(self.chol_check),
            smoker: f64::from(self.smoker),
            stroke: f64::from(self.stroke),
            sex: f64::from(self.sex),
            bmi: self.bmi,
            age: f64::from(self.age),
            income: f64::from(self.income),
            gen_hlth: f64::from(self.gen_hlth),
            ment_hlth: f64::from(self.ment_hlth),
            phys_hlth: f64::from(self.phys_hlth),
            education: f64::from(self.education),
        }
    }

    fn load_profile(&self) -> Result<PatientProfile> {
        match &self.input {
            Some(path) => {
                let content = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read {}", path.display()))?;
                serde_json::from_str(&content)
                    .with_context(|| format!("Invalid profile in {}", path.display()))
            }
            None => Ok(self.to_profile()),
        }
    }
}

async fn error_detail(response: reqwest::Response) -> String {
    let status = response.status();
    let text = response.text().await.unwrap_or_default();
    match serde_json::from_str::<ErrorResponse>(&text) {
        Ok(err) => format!("{} ({})", err.detail, status),
        Err(_) => format!("{} ({})", text, status),
    }
}

/// Submit a profile and print the verdict
pub async fn assess(client: &ApiClient, args: AssessArgs) -> Result<()> {
    let profile = args.load_profile()?;
    debug!(?profile, "Submitting profile");

    let response = client
        .client
        .post(client.url("/predict"))
        .json(&profile)
        .send()
        .await
        .with_context(|| format!("Is the diaclass service running at {}?", client.base_url))?;

    if response.status().is_success() {
        let decision: Decision = response.json().await?;
        println!("{}", render_decision(&decision));
    } else {
        anyhow::bail!("Service error: {}", error_detail(response).await);
    }

    Ok(())
}

/// Human-readable verdict
pub fn render_decision(decision: &Decision) -> String {
    let mut out = String::new();
    if decision.prediction.is_positive() {
        out.push_str("RISK DETECTED\n");
        out.push_str("The model has flagged this profile as High Risk for diabetes.\n");
        out.push_str("Immediate clinical review is recommended.\n");
    } else {
        out.push_str("NO RISK DETECTED\n");
        out.push_str("Current clinical indicators suggest a Low Risk profile.\n");
    }
    out.push('\n');
    out.push_str(&format!(
        "Probability: {:.1}% ({:+.2} relative to threshold)\n",
        decision.probability * 100.0,
        decision.probability - decision.threshold_used
    ));
    out.push_str(&format!(
        "Decision threshold: {:.4}\n",
        decision.threshold_used
    ));
    out.push_str(&format!(
        "Model: {} v{}",
        decision.model_name, decision.version
    ));
    out
}

/// Show model metadata
pub async fn metadata(client: &ApiClient) -> Result<()> {
    let response = client.client.get(client.url("/metadata")).send().await?;

    if response.status().is_success() {
        let meta: ModelMetadata = response.json().await?;
        println!("Model: {}", meta.model_name);
        println!("Version: {}", meta.version);
        println!("Threshold: {:.4}", meta.threshold);
        println!("Features ({}):", meta.features.len());
        for (i, name) in meta.features.iter().enumerate() {
            println!("  {:>2}. {}", i + 1, name);
        }
    } else {
        anyhow::bail!("Failed to get metadata: {}", error_detail(response).await);
    }

    Ok(())
}

/// Check service health; fails when the service reports unhealthy
pub async fn health(client: &ApiClient) -> Result<()> {
    let response = client.client.get(client.url("/health")).send().await?;

    if !response.status().is_success() {
        anyhow::bail!("Health check failed: {}", error_detail(response).await);
    }

    let health: HealthResponse = response.json().await?;
    println!(
        "Service: {} (model loaded: {})",
        health.status, health.model_loaded
    );
    if !health.model_loaded {
        anyhow::bail!("Service at {} is unhealthy", client.base_url);
    }

    Ok(())
}
