//! Thin client over the public GitHub API: `repos <owner/name>...` builds
//! up a list of repositories, `repos show <owner/name>` prints one
//! repository together with its most recent open issues.

use serde::Deserialize;

const API_URL: &str = "https://api.github.com";

#[derive(Debug, Deserialize)]
struct Repository {
    full_name: String,
    description: Option<String>,
    stargazers_count: u32,
    open_issues_count: u32,
}

#[derive(Debug, Deserialize)]
struct Issue {
    title: String,
    html_url: String,
    user: IssueAuthor,
}

#[derive(Debug, Deserialize)]
struct IssueAuthor {
    login: String,
}

fn client() -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder().user_agent("repos-cli").build()
}

async fn fetch_repository(client: &reqwest::Client, slug: &str) -> anyhow::Result<Repository> {
    let repository = client
        .get(format!("{API_URL}/repos/{slug}"))
        .send()
        .await?
        .error_for_status()?
        .json::<Repository>()
        .await?;
    Ok(repository)
}

async fn fetch_open_issues(client: &reqwest::Client, slug: &str) -> anyhow::Result<Vec<Issue>> {
    let issues = client
        .get(format!("{API_URL}/repos/{slug}/issues"))
        .query(&[("state", "open"), ("per_page", "5")])
        .send()
        .await?
        .error_for_status()?
        .json::<Vec<Issue>>()
        .await?;
    Ok(issues)
}

/// The list view: fetch each requested repository and print the growing
/// list of full names.
async fn list_repositories(client: &reqwest::Client, slugs: &[String]) -> anyhow::Result<()> {
    let mut repositories: Vec<String> = Vec::new();

    for slug in slugs {
        let repository = fetch_repository(client, slug).await?;
        repositories.push(repository.full_name);

        println!("Repositórios:");
        for name in &repositories {
            println!("  {name}");
        }
    }
    Ok(())
}

/// The detail view: repository metadata and its open issues, fetched
/// concurrently.
async fn show_repository(client: &reqwest::Client, slug: &str) -> anyhow::Result<()> {
    let (repository, issues) = futures::try_join!(
        fetch_repository(client, slug),
        fetch_open_issues(client, slug),
    )?;

    println!("{}", repository.full_name);
    if let Some(description) = &repository.description {
        println!("{description}");
    }
    println!(
        "⭐ {}  ·  {} issues abertas",
        repository.stargazers_count, repository.open_issues_count
    );

    for issue in issues {
        println!("- {} ({})", issue.title, issue.user.login);
        println!("  {}", issue.html_url);
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let args: Vec<String> = std::env::args().skip(1).collect();
    let client = client()?;

    match args.split_first() {
        Some((command, rest)) if command == "show" => {
            let Some(slug) = rest.first() else {
                anyhow::bail!("usage: repos show <owner/name>");
            };
            show_repository(&client, slug).await
        }
        Some(_) => list_repositories(&client, &args).await,
        None => anyhow::bail!("usage: repos <owner/name>... | repos show <owner/name>"),
    }
}
