//! zeuz command-line client entry point.

use clap::Parser;
use std::io::{self, Write};
use std::path::Path;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use zeuz_reader::{
    ApiClient, LocalStore, Session,
    config::{AdminCommand, Cli, Command, Config, NovelArgs},
    history::SearchHistory,
    models::{LibraryEntry, LibraryKind, Novel, NovelStatus, ProfileUpdate, format_count, time_ago},
    notice::Notice,
    screens::{
        ScreenState,
        admin::{self, ChapterDraft, DashboardStats, NovelDraft},
        bulk,
        detail::NovelDetail,
        home::HomeFeed,
        library::LibraryBrowser,
        profile::{self, Profile, ProfileImage, ProfileTarget},
        reader::Reader,
        search::SearchScreen,
    },
    settings::ReaderSettings,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "zeuz_reader=debug"
    } else {
        "zeuz_reader=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    // Init must work even when the existing config is broken
    if let Command::Init { force } = cli.command {
        return cmd_init(force);
    }

    // Find or load config
    let config_path = cli.config.clone().or_else(Config::find_config_file);

    let config = if let Some(ref path) = config_path {
        Config::load(path)?
    } else {
        Config::default()
    };

    let store = LocalStore::open(&config.storage.path)?;
    let api = ApiClient::new(&config.api)?;
    let mut session = Session::restore(api, store).await?;

    match cli.command {
        Command::Init { .. } => Ok(()),
        Command::Login { email, password } => {
            let password = match password {
                Some(p) => p,
                None => prompt_required("Password: ")?,
            };
            let user = session.login(&email, &password).await?;
            println!("Logged in as {} ({})", user.name, user.role);
            Ok(())
        }
        Command::GoogleLogin { redirect } => {
            println!("Open this URL in a browser, then run `zeuz token <TOKEN>`:");
            println!("{}", session.api().google_login_url(&redirect));
            Ok(())
        }
        Command::Token { token } => {
            let user = session.accept_token(&token).await?;
            println!("Logged in as {} ({})", user.name, user.role);
            Ok(())
        }
        Command::Logout => {
            session.logout()?;
            println!("Logged out.");
            Ok(())
        }
        Command::Whoami => {
            let user = session.require_user()?;
            println!("{} <{}>", user.name, user.email);
            println!("Role: {}", user.role);
            println!("Id:   {}", user.id);
            Ok(())
        }
        Command::Home { trending } => cmd_home(&session, trending).await,
        Command::Browse {
            category,
            status,
            sort,
            search,
            page,
        } => {
            cmd_browse(
                &session,
                config.library.page_size,
                category,
                status,
                sort,
                search,
                page,
            )
            .await
        }
        Command::Search { query, open } => cmd_search(&session, &query, open).await,
        Command::History { clear } => {
            let mut history = SearchHistory::load(session.store().clone())?;
            if clear {
                history.clear()?;
                println!("Search history cleared.");
            } else if history.entries().is_empty() {
                println!("No recent searches.");
            } else {
                for entry in history.entries() {
                    println!("  {}", entry);
                }
            }
            Ok(())
        }
        Command::Novel { id } => cmd_novel(&session, &id).await,
        Command::Read { id, chapter, once } => cmd_read(&session, &id, chapter, once).await,
        Command::Favorite { id } => {
            session.require_user()?;
            let mut detail = loaded(NovelDetail::load(session.api(), &id).await)?;
            let notice = detail.toggle_favorite(session.api()).await;
            println!("{}", notice);
            println!("Favorites: {}", format_count(detail.favorites()));
            Ok(())
        }
        Command::Notifications => {
            session.require_user()?;
            let mut feed = zeuz_reader::notifications::NotificationFeed::new();
            if !feed.refresh(session.api()).await {
                anyhow::bail!("Failed to fetch notifications");
            }
            if feed.items().is_empty() {
                println!("No new chapters.");
            }
            let now = chrono::Utc::now();
            for item in feed.items() {
                println!(
                    "{:<40} +{} chapters  {}  [{}]",
                    item.title,
                    item.new_chapters_count,
                    time_ago(item.last_chapter_update, now),
                    item.target_id()
                );
            }
            if let Some(badge) = feed.badge() {
                println!("\nUnread: {}", badge);
            }
            Ok(())
        }
        Command::Library { kind, user } => {
            if user.is_none() {
                session.require_user()?;
            }
            let entries = session.api().library(kind, user.as_deref()).await?;
            print_library(kind, &entries);
            Ok(())
        }
        Command::Profile { user_id, email } => {
            let target = match (user_id, email) {
                (Some(id), _) => ProfileTarget::Id(id),
                (None, Some(email)) => ProfileTarget::Email(email),
                (None, None) => {
                    session.require_user()?;
                    ProfileTarget::Me
                }
            };
            cmd_profile(&session, &target).await
        }
        Command::EditProfile {
            name,
            bio,
            public_history,
            picture,
            banner,
        } => {
            session.require_user()?;
            if name.is_some() || bio.is_some() || public_history.is_some() {
                let update = ProfileUpdate {
                    name,
                    bio,
                    is_history_public: public_history,
                    ..Default::default()
                };
                println!("{}", profile::save_profile(session.api(), &update).await);
            }
            if let Some(path) = picture {
                let notice =
                    profile::replace_image(session.api(), ProfileImage::Picture, &path).await;
                println!("{}", notice);
            }
            if let Some(path) = banner {
                let notice =
                    profile::replace_image(session.api(), ProfileImage::Banner, &path).await;
                println!("{}", notice);
            }
            let user = session.refresh_user().await?;
            println!("{} <{}>", user.name, user.email);
            Ok(())
        }
        Command::Settings {
            font_size,
            bigger,
            smaller,
            theme,
            font,
        } => {
            let store = session.store();
            let mut settings = ReaderSettings::load(store)?;
            if let Some(size) = font_size {
                settings.set_font_size(store, size)?;
            }
            if bigger {
                settings.adjust_font_size(store, 1)?;
            }
            if smaller {
                settings.adjust_font_size(store, -1)?;
            }
            if let Some(theme) = theme {
                settings.set_theme(store, theme)?;
            }
            if let Some(font) = font {
                settings.set_font(store, font)?;
            }
            println!("Font size:  {}", settings.font_size);
            println!(
                "Theme:      {:?} ({} on {})",
                settings.theme,
                settings.theme.text_color(),
                settings.theme.background()
            );
            println!("Font:       {}", settings.font.family());
            Ok(())
        }
        Command::Admin { action } => cmd_admin(&session, action).await,
    }
}

/// Write a default config file.
fn cmd_init(force: bool) -> anyhow::Result<()> {
    let config_path = Config::default_path();

    if config_path.exists() && !force {
        anyhow::bail!(
            "Config file already exists: {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&config_path, Config::generate_default())?;
    println!("Created config file: {}", config_path.display());
    println!("\nThen run: zeuz login --email you@example.com");

    Ok(())
}

fn loaded<T>(state: ScreenState<T>) -> anyhow::Result<T> {
    match state {
        ScreenState::Loaded(data) => Ok(data),
        ScreenState::Error(message) => anyhow::bail!(message),
        ScreenState::Loading => anyhow::bail!("Nothing loaded"),
    }
}

fn print_novels(novels: &[Novel]) {
    if novels.is_empty() {
        println!("  (none)");
        return;
    }
    for novel in novels {
        println!(
            "  {:<40} {:>5} ch  {:>7} views  {:<10} [{}]",
            novel.title,
            novel.chapter_count(),
            format_count(novel.views),
            novel.status,
            novel.id
        );
    }
}

fn print_library(kind: LibraryKind, entries: &[LibraryEntry]) {
    if entries.is_empty() {
        println!("No {} yet.", kind.as_str());
        return;
    }
    let now = chrono::Utc::now();
    for entry in entries {
        println!(
            "  {:<40} {:<24} {:>3}%  {}  [{}]",
            entry.title,
            entry.last_chapter_label(),
            entry.progress_percent(),
            time_ago(entry.last_read_at, now),
            entry.novel_id
        );
    }
}

async fn cmd_home(
    session: &Session,
    trending: zeuz_reader::screens::home::TrendingRange,
) -> anyhow::Result<()> {
    let feed = HomeFeed::load(session.api(), trending).await;

    if let Some(last) = &feed.last_read {
        println!("Continue reading: {} ({})", last.title, last.last_chapter_label());
        println!();
    }
    println!("Featured");
    print_novels(&feed.featured);
    println!("\nTrending ({})", feed.trending_range.as_str());
    print_novels(&feed.trending);
    println!("\nLatest updates");
    print_novels(&feed.latest_updates);
    println!("\nNew arrivals");
    print_novels(&feed.new_arrivals);
    if let Some(badge) = feed.notifications.badge() {
        println!("\nNotifications: {} unread", badge);
    }
    Ok(())
}

async fn cmd_browse(
    session: &Session,
    page_size: u32,
    category: String,
    status: Option<NovelStatus>,
    sort: zeuz_reader::screens::library::SortKey,
    search: Option<String>,
    page: u32,
) -> anyhow::Result<()> {
    let mut browser = LibraryBrowser::new(page_size);
    let filters = browser.filters_mut();
    filters.set_category(category);
    filters.set_status(status);
    filters.set_sort(sort);
    filters.set_search(search.unwrap_or_default());

    browser.load_page(session.api(), page).await;

    let result = loaded(browser.state().clone())?;
    println!(
        "{} novels, page {} of {}",
        result.total_novels,
        browser.filters().page(),
        result.total_pages
    );
    print_novels(&result.novels);

    if let Some(window) = browser.pagination() {
        let pages: Vec<String> = window
            .pages
            .iter()
            .map(|p| {
                if *p == browser.filters().page() {
                    format!("[{}]", p)
                } else {
                    p.to_string()
                }
            })
            .collect();
        println!(
            "{}{}{}",
            if window.has_prev { "< " } else { "" },
            pages.join(" "),
            if window.has_next { " >" } else { "" }
        );
    }
    Ok(())
}

async fn cmd_search(session: &Session, query: &str, open: Option<usize>) -> anyhow::Result<()> {
    let history = SearchHistory::load(session.store().clone())?;
    let mut screen = SearchScreen::new(history);
    screen.search(session.api(), query).await;

    if let Some(message) = screen.results().error() {
        anyhow::bail!(message.to_string());
    }
    if let Some(novels) = screen.results().data() {
        if novels.is_empty() {
            println!("No results for \"{}\".", screen.query());
        }
        for (i, novel) in novels.iter().enumerate() {
            println!("{:>3}. {} [{}]", i + 1, novel.title, novel.id);
        }
    }

    if let Some(n) = open {
        let id = screen
            .open(n.saturating_sub(1))?
            .map(|novel| novel.id.clone());
        match id {
            Some(id) => cmd_novel(session, &id).await?,
            None => println!("No result #{}.", n),
        }
    }
    Ok(())
}

async fn cmd_novel(session: &Session, id: &str) -> anyhow::Result<()> {
    let detail = loaded(NovelDetail::load(session.api(), id).await)?;
    let novel = &detail.novel;

    println!("{}", novel.title);
    if let Some(author) = &novel.author {
        println!("by {}", author);
    }
    if let Some(publisher) = &detail.author {
        println!("published by {} <{}>", publisher.name, publisher.email);
    }
    println!(
        "{} | {} views | {} favorites{}",
        novel.status,
        format_count(novel.views),
        format_count(detail.favorites()),
        if detail.is_favorite() { " (yours)" } else { "" }
    );
    if !novel.tags.is_empty() {
        println!("Tags: {}", novel.tags.join(", "));
    }
    if let Some(description) = &novel.description {
        println!("\n{}\n", description);
    }

    for chapter in detail.chapters(true) {
        let mark = if detail.is_read(chapter.number) { "✓" } else { " " };
        println!("  {} {:>4}. {}", mark, chapter.number, chapter.title);
    }

    match detail.resume() {
        Ok(n) => println!("\nContinue with: zeuz read {} {}", novel.id, n),
        Err(notice) => println!("\n{}", notice),
    }
    if detail.can_edit(session.user()) {
        println!("You can edit this novel (zeuz admin ...).");
    }
    Ok(())
}

async fn cmd_read(
    session: &Session,
    id: &str,
    chapter: Option<u32>,
    once: bool,
) -> anyhow::Result<()> {
    let detail = loaded(NovelDetail::load(session.api(), id).await)?;
    let start = match chapter {
        Some(n) => n,
        None => match detail.resume() {
            Ok(n) => n,
            Err(notice) => {
                println!("{}", notice);
                return Ok(());
            }
        },
    };

    let api = session.api();
    let settings = ReaderSettings::load(session.store())?;
    let mut reader = Reader::new(api, detail.novel, start);
    let mut reports: Vec<_> = reader.load(api).await.into_iter().collect();

    loop {
        match reader.chapter() {
            ScreenState::Loaded(chapter) => {
                let nav = reader.navigator();
                if nav.total() > 0 {
                    println!("\n== {} ({}/{}) ==\n", chapter.title, nav.current(), nav.total());
                } else {
                    println!("\n== {} ({}) ==\n", chapter.title, nav.current());
                }
                for paragraph in reader.paragraphs() {
                    println!("{}\n", paragraph);
                }
            }
            ScreenState::Error(message) => println!("{}", Notice::error(message.clone())),
            ScreenState::Loading => {}
        }

        if once {
            break;
        }

        let answer = prompt(&format!(
            "[n]ext [p]rev [q]uit (font {}) > ",
            settings.font_size
        ))?;
        let notice = match pager_key(answer.as_deref()) {
            PagerKey::Next => reader.next(api).await,
            PagerKey::Prev => reader.prev(api).await,
            PagerKey::Quit => break,
            PagerKey::Ignore => continue,
        };
        if let Some(notice) = notice {
            println!("{}", notice);
        }
        reports.extend(reader.take_report());
    }

    // Let pending reports land before the runtime shuts down.
    for handle in reports {
        let _ = handle.await;
    }
    Ok(())
}

async fn cmd_profile(session: &Session, target: &ProfileTarget) -> anyhow::Result<()> {
    let profile: Profile = loaded(Profile::load(session.api(), target, session.user()).await)?;

    if let Some(user) = &profile.user {
        println!("{} ({})", user.name, user.role);
        if let Some(bio) = &user.bio {
            println!("{}", bio);
        }
    }
    if let Some(joined) = profile.joined() {
        println!("Joined {}", joined.format("%Y-%m-%d"));
    }
    println!(
        "Read {} chapters | Added {} chapters | {} views",
        format_count(profile.read_chapters),
        format_count(profile.added_chapters),
        format_count(profile.total_views)
    );

    if !profile.works.is_empty() {
        println!("\nWorks");
        print_novels(&profile.works);
    }
    if profile.library_visible() {
        println!("\nHistory");
        print_library(LibraryKind::History, &profile.history);
        println!("\nFavorites");
        print_library(LibraryKind::Favorites, &profile.favorites);
    } else {
        println!("\nReading history is private.");
    }
    Ok(())
}

async fn novel_draft(session: &Session, args: NovelArgs) -> anyhow::Result<NovelDraft> {
    let cover = match (args.cover, args.cover_file) {
        (Some(url), _) => url,
        (None, Some(path)) => session.api().upload_image(&path).await?,
        (None, None) => String::new(),
    };

    let mut draft = NovelDraft {
        title: args.title,
        cover,
        description: args.description,
        status: args.status,
        ..Default::default()
    };
    for tag in &args.tags {
        draft.add_custom_tag(tag);
    }
    Ok(draft)
}

fn read_text(path: &Path) -> anyhow::Result<String> {
    Ok(std::fs::read_to_string(path)?)
}

async fn cmd_admin(session: &Session, action: AdminCommand) -> anyhow::Result<()> {
    let user = session.require_user()?;
    if !user.role.can_publish() {
        anyhow::bail!("Your account cannot publish");
    }
    let api = session.api();

    let notice = match action {
        AdminCommand::Stats => {
            let stats = DashboardStats::load(api).await?;
            println!("Users:  {}", stats.users);
            println!("Novels: {}", stats.novels);
            return Ok(());
        }
        AdminCommand::Works => {
            let works = loaded(admin::my_works(api).await)?;
            print_novels(&works);
            return Ok(());
        }
        AdminCommand::CreateNovel(args) => {
            let draft = novel_draft(session, args).await?;
            admin::save_novel(api, None, &draft).await
        }
        AdminCommand::UpdateNovel { id, novel } => {
            let draft = novel_draft(session, novel).await?;
            admin::save_novel(api, Some(&id), &draft).await
        }
        AdminCommand::DeleteNovel { id } => {
            if !confirm(&format!("Delete novel {} and all its chapters?", id))? {
                return Ok(());
            }
            admin::delete_novel(api, &id).await
        }
        AdminCommand::AddChapter {
            novel,
            number,
            title,
            file,
        } => {
            let mut draft = match number {
                Some(number) => ChapterDraft {
                    novel_id: novel,
                    number: Some(number),
                    ..Default::default()
                },
                None => ChapterDraft::next_for(&api.novel(&novel).await?),
            };
            draft.title = title;
            draft.content = read_text(&file)?;
            println!("Chapter {}", draft.number.unwrap_or_default());
            admin::save_chapter(api, &draft, false).await
        }
        AdminCommand::EditChapter {
            novel,
            number,
            title,
            file,
        } => {
            let draft = ChapterDraft {
                novel_id: novel,
                number: Some(number),
                title,
                content: read_text(&file)?,
            };
            admin::save_chapter(api, &draft, true).await
        }
        AdminCommand::DeleteChapter { novel, number } => {
            if !confirm(&format!("Delete chapter {}?", number))? {
                return Ok(());
            }
            let mut detail = loaded(NovelDetail::load(api, &novel).await)?;
            if !detail.can_edit(Some(user)) {
                anyhow::bail!("You do not own this novel");
            }
            detail.delete_chapter(api, number).await
        }
        AdminCommand::BulkUpload { novel, zip } => {
            let (lines, notice) = bulk::upload(api, &novel, &zip).await;
            for line in &lines {
                println!("{}", line);
            }
            notice
        }
        AdminCommand::Users => {
            let users = loaded(admin::users(api).await)?;
            println!("{:<26} {:<12} {:<30} NAME", "ID", "ROLE", "EMAIL");
            println!("{}", "-".repeat(80));
            for user in users {
                println!(
                    "{:<26} {:<12} {:<30} {}",
                    user.id, user.role, user.email, user.name
                );
            }
            return Ok(());
        }
        AdminCommand::Role { user, role } => admin::change_role(api, &user, role).await,
        AdminCommand::DeleteUser { user } => {
            if !confirm(&format!("Delete user {}?", user))? {
                return Ok(());
            }
            admin::remove_user(api, &user).await
        }
        AdminCommand::Upload { image } => {
            let url = api.upload_image(&image).await?;
            println!("{}", url);
            Notice::success("Image uploaded")
        }
    };

    println!("{}", notice);
    if notice.is_error() {
        std::process::exit(1);
    }
    Ok(())
}

/// Prompt for a line of input.
/// Pager keystroke.
#[derive(Debug, PartialEq, Eq)]
enum PagerKey {
    Next,
    Prev,
    Quit,
    Ignore,
}

/// Map a pager answer to an action. End of input quits.
fn pager_key(answer: Option<&str>) -> PagerKey {
    match answer {
        None | Some("q") => PagerKey::Quit,
        Some("n" | "") => PagerKey::Next,
        Some("p") => PagerKey::Prev,
        Some(_) => PagerKey::Ignore,
    }
}

/// Read one trimmed line from stdin. `None` at end of input.
fn prompt(prompt: &str) -> anyhow::Result<Option<String>> {
    print!("{}", prompt);
    io::stdout().flush()?;

    let mut line = String::new();
    if io::stdin().read_line(&mut line)? == 0 {
        return Ok(None);
    }

    Ok(Some(line.trim().to_string()))
}

/// Like [`prompt`], but end of input is an error.
fn prompt_required(question: &str) -> anyhow::Result<String> {
    prompt(question)?.ok_or_else(|| anyhow::anyhow!("No input available"))
}

fn confirm(question: &str) -> anyhow::Result<bool> {
    let answer = prompt(&format!("{} [y/N] ", question))?;
    Ok(matches!(answer.as_deref(), Some("y" | "Y" | "yes")))
}
