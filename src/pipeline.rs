//! The two stages, each run start to finish by one invocation.

use crate::avatar::{self, Avatars};
use crate::config::{CollectConfig, RenderConfig};
use crate::error::{Error, Result};
use crate::github::GithubClient;
use crate::rank::rank;
use crate::render::{self, Canvas, Style};
use crate::tally::Tally;
use chrono::{NaiveDate, Utc};
use reqwest::Client;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// Fetch the newest page of pull requests and overwrite the tally file.
pub async fn collect(config: &CollectConfig) -> Result<Tally> {
    let client = GithubClient::new(config.token.clone(), config.api_url.as_str())?;
    let records = client
        .pull_requests(&config.user, config.page_size)
        .await?;
    info!(user = %config.user, count = records.len(), "fetched pull requests");

    let tally = Tally::from_records(records);
    tally.save(&config.data)?;
    info!(
        path = %config.data.display(),
        orgs = tally.len(),
        pull_requests = tally.iter().map(|(_, c)| c.total()).sum::<u64>(),
        "wrote tally"
    );
    Ok(tally)
}

#[derive(Debug)]
pub struct RenderSummary {
    pub organizations: usize,
    pub avatars: usize,
}

pub async fn render(config: &RenderConfig) -> Result<RenderSummary> {
    render_on(config, Utc::now().date_naive()).await
}

async fn render_on(config: &RenderConfig, today: NaiveDate) -> Result<RenderSummary> {
    let tally = Tally::load(&config.data)?;
    if tally.is_empty() {
        warn!(path = %config.data.display(), "tally has no organizations");
    }
    let orgs = rank(&tally, &config.exclude, config.max_orgs);
    info!(
        tallied = tally.len(),
        shown = orgs.len(),
        style = ?config.style,
        "ranked organizations"
    );

    let avatars = match config.style {
        Style::Radial => {
            let http = Client::new();
            let logins = std::iter::once(config.user.as_str())
                .chain(orgs.iter().map(|o| o.name.as_str()));
            avatar::fetch_all(&http, &config.avatar_base, logins).await
        }
        Style::Bar => Avatars::new(),
    };

    let canvas = Canvas {
        user: &config.user,
        theme: config.theme,
        show_closed: config.show_closed,
        generated_on: today,
    };
    let svg = render::render(config.style, &canvas, &orgs, &avatars);
    write_output(&config.output, &svg)?;
    info!(path = %config.output.display(), bytes = svg.len(), "wrote svg");

    Ok(RenderSummary {
        organizations: orgs.len(),
        avatars: avatars.len(),
    })
}

fn write_output(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }
    fs::write(path, contents).map_err(|e| Error::io(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::Theme;
    use crate::tally::Counts;
    use mockito::Server;
    use std::path::PathBuf;

    fn render_config(dir: &Path, style: Style, avatar_base: String) -> RenderConfig {
        RenderConfig {
            user: "me".into(),
            data: dir.join("data.json"),
            style,
            theme: Theme::Dark,
            exclude: vec!["me".into()],
            max_orgs: 8,
            show_closed: true,
            avatar_base,
            output: dir.join("out").join("chart.svg"),
        }
    }

    fn write_sample_tally(path: &Path) {
        let tally: Tally = [
            ("orgA".to_string(), Counts::new(3, 1, 2)),
            ("orgB".to_string(), Counts::new(0, 2, 0)),
            ("me".to_string(), Counts::new(5, 0, 0)),
        ]
        .into_iter()
        .collect();
        tally.save(path).unwrap();
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 14).unwrap()
    }

    #[tokio::test]
    async fn collect_writes_the_tally() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/graphql")
            .with_status(200)
            .with_body(
                serde_json::json!({ "data": { "user": { "pullRequests": { "nodes": [
                    { "state": "MERGED", "repository": { "owner": { "login": "orgA" } } },
                    { "state": "CLOSED", "repository": { "owner": { "login": "orgA" } } },
                    { "state": "OPEN", "repository": { "owner": { "login": "orgB" } } }
                ] } } } })
                .to_string(),
            )
            .create_async()
            .await;

        let dir = tempfile::tempdir().unwrap();
        let config = CollectConfig {
            user: "me".into(),
            token: Some("t".into()),
            api_url: format!("{}/graphql", server.url()),
            page_size: 100,
            data: dir.path().join("charts").join("data.json"),
        };

        collect(&config).await.unwrap();
        let tally = Tally::load(&config.data).unwrap();
        assert_eq!(tally.get("orgA"), Some(&Counts::new(1, 0, 1)));
        assert_eq!(tally.get("orgB"), Some(&Counts::new(0, 1, 0)));
    }

    #[tokio::test]
    async fn failed_collect_leaves_previous_tally_alone() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/graphql")
            .with_status(401)
            .create_async()
            .await;

        let dir = tempfile::tempdir().unwrap();
        let data = dir.path().join("data.json");
        write_sample_tally(&data);
        let before = fs::read_to_string(&data).unwrap();

        let config = CollectConfig {
            user: "me".into(),
            token: Some("revoked".into()),
            api_url: format!("{}/graphql", server.url()),
            page_size: 100,
            data: data.clone(),
        };
        let err = collect(&config).await.unwrap_err();
        assert!(matches!(err, Error::Auth(_)));
        assert_eq!(fs::read_to_string(&data).unwrap(), before);
    }

    #[tokio::test]
    async fn collect_without_token_sends_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let config = CollectConfig {
            user: "me".into(),
            token: None,
            api_url: "http://127.0.0.1:1/graphql".into(),
            page_size: 100,
            data: dir.path().join("data.json"),
        };
        assert!(matches!(collect(&config).await, Err(Error::Auth(_))));
        assert!(!config.data.exists());
    }

    #[tokio::test]
    async fn radial_render_survives_a_missing_avatar() {
        let mut server = Server::new_async().await;
        let mut mocks = Vec::new();
        for login in ["me", "orgA"] {
            let mock = server
                .mock("GET", format!("/{login}.png").as_str())
                .with_status(200)
                .with_header("content-type", "image/png")
                .with_body("png")
                .create_async()
                .await;
            mocks.push(mock);
        }
        let _mock = server
            .mock("GET", "/orgB.png")
            .with_status(404)
            .create_async()
            .await;

        let dir = tempfile::tempdir().unwrap();
        let config = render_config(dir.path(), Style::Radial, server.url());
        write_sample_tally(&config.data);

        let summary = render_on(&config, today()).await.unwrap();
        assert_eq!(summary.organizations, 2);
        assert_eq!(summary.avatars, 2);

        let svg = fs::read_to_string(&config.output).unwrap();
        assert_eq!(svg.matches("<image ").count(), 2);
        assert!(svg.contains(">orgA</text>"));
        assert!(svg.contains(">orgB</text>"));
        assert!(!svg.contains(">me</text>"));
    }

    #[tokio::test]
    async fn counts_near_u32_max_still_render() {
        let dir = tempfile::tempdir().unwrap();
        for style in [Style::Radial, Style::Bar] {
            let config = render_config(dir.path(), style, "http://127.0.0.1:1".into());
            fs::write(
                &config.data,
                r#"{"orgA": {"MERGED": 4294967295, "OPEN": 1, "CLOSED": 4294967295},
                    "orgB": {"MERGED": 4100000000, "OPEN": 0, "CLOSED": 0}}"#,
            )
            .unwrap();

            let summary = render_on(&config, today()).await.unwrap();
            assert_eq!(summary.organizations, 2, "{style:?}");
            let svg = fs::read_to_string(&config.output).unwrap();
            assert!(svg.contains(">orgA</text>"), "{style:?}");
        }
    }

    #[tokio::test]
    async fn bar_render_fetches_no_avatars() {
        let dir = tempfile::tempdir().unwrap();
        // Unreachable base: any fetch would only log, but none should happen.
        let config = render_config(dir.path(), Style::Bar, "http://127.0.0.1:1".into());
        write_sample_tally(&config.data);

        let summary = render_on(&config, today()).await.unwrap();
        assert_eq!(summary.avatars, 0);
        let svg = fs::read_to_string(&config.output).unwrap();
        assert!(svg.contains("as of 2026-10-14"));
        assert_eq!(svg.matches(r#"class="bar""#).count(), 4);
    }

    #[tokio::test]
    async fn missing_tally_fails_without_output() {
        let dir = tempfile::tempdir().unwrap();
        let config = render_config(dir.path(), Style::Radial, "http://127.0.0.1:1".into());

        let err = render_on(&config, today()).await.unwrap_err();
        assert!(matches!(err, Error::DataLoad { .. }));
        assert!(!config.output.exists());
    }

    #[test]
    fn write_output_reports_unwritable_path() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        fs::write(&blocker, "").unwrap();
        let err = write_output(&PathBuf::from(&blocker).join("chart.svg"), "<svg/>").unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }
}
