//! folio demo: seed an in-memory store, publish a few records, print the
//! published listing.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use folio_core::app::CollectionBuilder;
use folio_core::config::SyncConfig;
use folio_core::domain::{
    BlogPost, LiteraryWork, Post, PostDraft, PostFields, PostPatch, PublicationStatus, Work,
    WorkDraft, WorkFields, WorkType,
};
use folio_core::impls::{InMemoryRemoteStore, SessionIdentity, TracingEventSink};
use folio_core::listing::{
    Listable, ListingQuery, SortOrder, categories, featured, format_long_date, reading_time,
};
use folio_core::ports::{Identity, SystemClock, UlidGenerator};

/// Portfolio collection sync demo
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Config file (TOML). Defaults apply when omitted.
    #[arg(short = 'C', long)]
    config: Option<PathBuf>,

    /// Case-insensitive search over title and excerpt / description
    #[arg(short, long, default_value = "")]
    search: String,

    /// Tag to filter by ("all" for every category)
    #[arg(short, long, default_value = "all")]
    category: String,

    /// newest, oldest or fetched
    #[arg(long, default_value = "newest")]
    sort: SortOrder,

    /// Identity the demo signs in as
    #[arg(long, default_value = "demo-author")]
    author: String,

    /// Print the listings as JSON
    #[arg(long)]
    json: bool,
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_target(true)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let config = match &cli.config {
        Some(path) => SyncConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => SyncConfig::default(),
    };

    // (A) Remote Store と identity を用意
    let store = Arc::new(InMemoryRemoteStore::new(
        Arc::new(UlidGenerator::new(SystemClock)),
        Arc::new(SystemClock),
    ));
    let session = Arc::new(SessionIdentity::anonymous());
    let builder = CollectionBuilder::new()
        .store(store)
        .identity(session.clone())
        .events(Arc::new(TracingEventSink))
        .config(config.clone());

    let posts = Arc::new(builder.full::<Post>()?);
    let works = Arc::new(builder.full::<Work>()?);

    // (B) サインインで自動 fetch
    let post_activation = posts.activate();
    let work_activation = works.activate();
    session.sign_in(Identity::new(cli.author.as_str()));

    // (C) 書き込み
    seed(&posts, &works).await?;
    post_activation.shutdown().await;
    work_activation.shutdown().await;
    // サインイン時の fetch が seed より後に解決すると一覧から落ちるので読み直す
    posts.fetch_all().await;
    works.fetch_all().await;
    info!(
        posts = posts.items().len(),
        works = works.items().len(),
        "seeded collections"
    );

    // (D) 公開済みビューを読む（identity 不要）
    let published_posts = Arc::new(builder.published::<Post>()?);
    let published_works = Arc::new(builder.published::<Work>()?);
    published_posts.activate().shutdown().await;
    published_works.activate().shutdown().await;

    if let Some(error) = published_posts
        .last_error()
        .or_else(|| published_works.last_error())
    {
        anyhow::bail!("fetch failed: {}", error.message);
    }

    let query = ListingQuery::new()
        .search(cli.search.as_str())
        .category(cli.category.as_str())
        .sort(cli.sort);
    let post_items = published_posts.items();
    let work_items = published_works.items();

    if cli.json {
        let listing = serde_json::json!({
            "posts": query.apply(&post_items),
            "works": query.apply(&work_items),
        });
        println!("{}", serde_json::to_string_pretty(&listing)?);
        return Ok(());
    }

    let wpm = config.listing.words_per_minute;
    println!("categories: {}", categories(&post_items).join(", "));
    if let Some(post) = featured(&post_items) {
        println!("featured: {}", post.title);
    }
    println!();
    println!("== posts ==");
    for post in query.apply(&post_items) {
        print_post(post, wpm);
    }
    println!();
    println!("== works ==");
    for work in query.apply(&work_items) {
        print_work(work);
    }

    Ok(())
}

async fn seed(
    posts: &folio_core::app::ResourceCollection<Post>,
    works: &folio_core::app::ResourceCollection<Work>,
) -> Result<()> {
    let hello = posts
        .create(
            PostDraft::titled("Hello, World! 2024")
                .with_tags(["rust", "meta"])
                .with_fields(PostFields {
                    excerpt: Some("Why this site exists".into()),
                    content: Some("A short note about starting over with a new site.".into()),
                    featured_image: None,
                }),
        )
        .await?;
    posts
        .create(
            PostDraft::titled("Notes on revision")
                .with_status(PublicationStatus::Published)
                .with_tags(["craft"])
                .with_fields(PostFields {
                    excerpt: Some("Cutting is writing".into()),
                    content: Some("Every draft gets shorter before it gets better.".into()),
                    featured_image: None,
                }),
        )
        .await?;
    posts
        .create(PostDraft::titled("Unfinished thoughts"))
        .await?;
    posts
        .update(
            &hello.id,
            PostPatch::default().with_status(PublicationStatus::Published),
        )
        .await?;

    works
        .create(
            WorkDraft::titled("Salt and Iron")
                .with_status(PublicationStatus::Published)
                .with_tags(["poetry"])
                .with_fields(WorkFields {
                    kind: Some(WorkType::Poem),
                    description: Some("A poem about the harbour".into()),
                    ..WorkFields::default()
                }),
        )
        .await?;
    works
        .create(WorkDraft::titled("The Long Winter").with_fields(WorkFields {
            kind: Some(WorkType::Novel),
            ..WorkFields::default()
        }))
        .await?;

    Ok(())
}

fn print_post(post: &BlogPost, words_per_minute: u32) {
    println!(
        "{}  {}  [{}]  {}  /{}",
        format_long_date(post.listing_date()),
        post.title,
        post.tags.join(", "),
        reading_time(&post.content, words_per_minute),
        post.slug,
    );
}

fn print_work(work: &LiteraryWork) {
    println!(
        "{}  {} ({})  {}",
        format_long_date(work.listing_date()),
        work.title,
        work.kind,
        work.description.as_deref().unwrap_or(""),
    );
}
