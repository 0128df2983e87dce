//! corkboard - Kanban boards from the terminal
//!
//! Main entry point for the corkboard CLI. Every invocation signs in with
//! the configured account and keeps the access token in memory only.

mod commands;

use clap::Parser;
use commands::{BoardCommands, CardCommands, Cli, Commands, ListCommands};
use corkboard::api::{BoardApi, RestBoardApi};
use corkboard::auth::AuthService;
use corkboard::board::{BoardStore, CardDraft, CardSlot, Confirm, DragResult, List, Notifier};
use corkboard::config::{validate_config_result, CorkboardConfig};
use corkboard::dashboard::Dashboard;
use corkboard::http::{ApiClient, Session};
use corkboard::prompt::{self, TerminalConfirm, TerminalNotifier};
use corkboard::retry::{with_transient_retry, RetryConfig};
use corkboard::{style, CorkboardError, Result};
use kanban_api::{BoardId, CardId, ListId, User};
use std::process;
use std::sync::Arc;

/// Password source for non-interactive use
const PASSWORD_ENV: &str = "CORKBOARD_PASSWORD";

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Initialize logging
    if let Err(e) = corkboard::logging::init() {
        eprintln!("Failed to initialize logging: {}", e);
    }

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("{} {}", style::error("Error:"), e);
        process::exit(1);
    }
}

/// Wiring shared by every command
struct App {
    auth: AuthService,
    api: Arc<dyn BoardApi>,
    confirm: Arc<dyn Confirm>,
    notifier: Arc<dyn Notifier>,
    retry: RetryConfig,
    drag_retry: RetryConfig,
    email: Option<String>,
}

impl App {
    fn new(cli: &Cli) -> Result<Self> {
        let mut config = CorkboardConfig::load_or_default(cli.config.as_deref())?;
        if let Some(ref url) = cli.api_url {
            config.api.base_url = url.clone();
        }
        validate_config_result(&config)?;
        tracing::info!(base_url = %config.api.base_url, "Configuration loaded");

        let client = Arc::new(ApiClient::from_config(&config.api, Arc::new(Session::new()))?);

        Ok(Self {
            auth: AuthService::new(Arc::clone(&client)),
            api: Arc::new(RestBoardApi::new(client)),
            confirm: Arc::new(TerminalConfirm::new(cli.yes)),
            notifier: Arc::new(TerminalNotifier),
            retry: config.retry.to_retry_config(),
            drag_retry: config.drag_retry.to_retry_config(),
            email: cli.email.clone(),
        })
    }

    fn email(&self) -> Result<String> {
        match self.email {
            Some(ref email) => Ok(email.clone()),
            None => prompt::input("Email"),
        }
    }

    fn password() -> Result<String> {
        match std::env::var(PASSWORD_ENV) {
            Ok(password) if !password.is_empty() => Ok(password),
            _ => prompt::password("Password"),
        }
    }

    async fn login(&self) -> Result<User> {
        let email = self.email()?;
        let password = Self::password()?;

        // Wrong credentials fail at once; only network trouble is retried
        let auth = &self.auth;
        let (email, password) = (email.as_str(), password.as_str());
        with_transient_retry(&self.retry, "login", move || auth.login(email, password)).await
    }

    fn dashboard(&self) -> Dashboard {
        Dashboard::new(
            Arc::clone(&self.api),
            Arc::clone(&self.confirm),
            Arc::clone(&self.notifier),
        )
    }

    async fn loaded_dashboard(&self) -> Result<Dashboard> {
        let mut dashboard = self.dashboard();
        dashboard.refresh().await?;
        Ok(dashboard)
    }

    async fn resolve_board(&self, key: &str) -> Result<BoardId> {
        let dashboard = self.loaded_dashboard().await?;
        dashboard
            .find(key)
            .map(|b| b.id)
            .ok_or_else(|| CorkboardError::NotFound(format!("board '{}'", key)))
    }

    async fn open_board(&self, key: &str) -> Result<BoardStore> {
        let board_id = self.resolve_board(key).await?;
        let mut store = BoardStore::new(
            Arc::clone(&self.api),
            Arc::clone(&self.confirm),
            Arc::clone(&self.notifier),
        )
        .with_drag_retry(self.drag_retry.clone());
        store.load_board(board_id).await?;
        Ok(store)
    }
}

async fn run(cli: Cli) -> Result<()> {
    let app = App::new(&cli)?;

    match cli.command {
        Commands::Login => {
            let user = app.login().await?;
            println!(
                "{} Logged in as {} <{}>",
                style::success("✓"),
                user.full_name,
                user.email
            );
        }

        Commands::Register { name } => {
            let name = match name {
                Some(name) => name,
                None => prompt::input("Full name")?,
            };
            let email = app.email()?;
            let password = App::password()?;
            let user = app.auth.register(&name, &email, &password).await?;
            println!(
                "{} Registered {} <{}>",
                style::success("✓"),
                user.full_name,
                user.email
            );
        }

        Commands::Whoami => {
            app.login().await?;
            let user = app.auth.me().await?;
            println!("{} <{}> {}", user.full_name, user.email, style::id(user.id));
        }

        Commands::Logout => {
            app.login().await?;
            app.auth.logout().await;
            println!("{} Logged out", style::success("✓"));
        }

        Commands::Passwd => {
            let email = app.email()?;
            let current = App::password()?;
            app.auth.login(&email, &current).await?;

            let new_password = prompt::password("New password")?;
            let confirmation = prompt::password("Confirm new password")?;
            app.auth
                .change_password(&current, &new_password, &confirmation)
                .await?;
            println!("{} Password changed", style::success("✓"));
        }

        Commands::Boards => {
            app.login().await?;
            let dashboard = app.loaded_dashboard().await?;
            print_boards(&dashboard);
        }

        Commands::Board(command) => {
            app.login().await?;
            handle_board_command(&app, command).await?;
        }

        Commands::Show { board } => {
            app.login().await?;
            let store = app.open_board(&board).await?;
            print_board(&store);
        }

        Commands::List(command) => {
            app.login().await?;
            handle_list_command(&app, command).await?;
        }

        Commands::Card(command) => {
            app.login().await?;
            handle_card_command(&app, command).await?;
        }
    }

    Ok(())
}

async fn handle_board_command(app: &App, command: BoardCommands) -> Result<()> {
    let mut dashboard = app.loaded_dashboard().await?;

    match command {
        BoardCommands::Create { title } => match dashboard.create_board(&title).await? {
            Some(id) => println!("{} {}", style::id(id), title.trim()),
            None => println!("{}", style::warning("Board title cannot be empty")),
        },

        BoardCommands::Rename { board, title } => {
            let id = find_board(&dashboard, &board)?;
            if dashboard.rename_board(id, &title).await? {
                println!("{} Renamed board {}", style::success("✓"), style::id(id));
            } else {
                println!("{}", style::warning("Board title cannot be empty"));
            }
        }

        BoardCommands::Delete { board } => {
            let id = find_board(&dashboard, &board)?;
            if !dashboard.delete_board(id).await? {
                println!("{}", style::dim("Cancelled"));
            }
        }
    }

    Ok(())
}

async fn handle_list_command(app: &App, command: ListCommands) -> Result<()> {
    match command {
        ListCommands::Add { board, title } => {
            let mut store = app.open_board(&board).await?;
            match store.add_list(&title).await? {
                Some(_) => print_latest_activity(&store),
                None => println!("{}", style::warning("List title cannot be empty")),
            }
        }

        ListCommands::Rename { board, list, title } => {
            let mut store = app.open_board(&board).await?;
            let list_id = find_list(&store, &list)?.id;
            if store.edit_list_title(list_id, &title).await? {
                print_latest_activity(&store);
            } else {
                println!("{}", style::warning("List title cannot be empty"));
            }
        }

        ListCommands::Delete { board, list } => {
            let mut store = app.open_board(&board).await?;
            let list_id = find_list(&store, &list)?.id;
            if store.delete_list(list_id).await? {
                print_latest_activity(&store);
            } else {
                println!("{}", style::dim("Cancelled"));
            }
        }

        ListCommands::Move { board, list, to } => {
            let mut store = app.open_board(&board).await?;
            let list_id = find_list(&store, &list)?.id;
            let source = store
                .lists()
                .iter()
                .position(|l| l.id == list_id)
                .ok_or_else(|| CorkboardError::NotFound(format!("list '{}'", list)))?;

            match store.resolve_drag_end(DragResult::list(source, to)).await? {
                Some(_) => print_board(&store),
                None => println!("{}", style::dim("List is already there")),
            }
        }
    }

    Ok(())
}

async fn handle_card_command(app: &App, command: CardCommands) -> Result<()> {
    match command {
        CardCommands::Add {
            board,
            list,
            title,
            description,
        } => {
            let mut store = app.open_board(&board).await?;
            let list_id = find_list(&store, &list)?.id;
            let mut draft = CardDraft::new(title);
            if let Some(description) = description {
                draft = draft.with_description(description);
            }

            match store.add_card(list_id, &draft).await? {
                Some(_) => print_latest_activity(&store),
                None => println!("{}", style::warning("Card title cannot be empty")),
            }
        }

        CardCommands::Edit {
            board,
            card,
            title,
            description,
            clear_description,
        } => {
            let mut store = app.open_board(&board).await?;
            let slot = find_card(&store, &card)?;
            let current = store
                .list(slot.list_id)
                .and_then(|l| l.cards.get(slot.index))
                .ok_or_else(|| CorkboardError::NotFound(format!("card '{}'", card)))?;

            let draft = CardDraft::editing(current, title, description, clear_description);
            let card_id = current.id;

            if store.edit_card(slot.list_id, card_id, &draft).await? {
                print_latest_activity(&store);
            } else {
                println!("{}", style::warning("Card title cannot be empty"));
            }
        }

        CardCommands::Delete { board, card } => {
            let mut store = app.open_board(&board).await?;
            let slot = find_card(&store, &card)?;
            let card_id = parse_card_id(&card)?;
            store.delete_card(slot.list_id, card_id).await?;
            print_latest_activity(&store);
        }

        CardCommands::Move {
            board,
            card,
            to_list,
            index,
        } => {
            let mut store = app.open_board(&board).await?;
            let source = find_card(&store, &card)?;
            let destination = match to_list {
                Some(ref key) => find_list(&store, key)?.id,
                None => source.list_id,
            };

            let drag = DragResult::card(source, CardSlot::new(destination, index));
            match store.resolve_drag_end(drag).await? {
                Some(_) => print_latest_activity(&store),
                None => println!("{}", style::dim("Card is already there")),
            }
        }
    }

    Ok(())
}

fn find_board(dashboard: &Dashboard, key: &str) -> Result<BoardId> {
    dashboard
        .find(key)
        .map(|b| b.id)
        .ok_or_else(|| CorkboardError::NotFound(format!("board '{}'", key)))
}

/// Find a list on the open board by id or case-insensitive title
fn find_list<'a>(store: &'a BoardStore, key: &str) -> Result<&'a List> {
    let by_id = key
        .parse::<ListId>()
        .ok()
        .and_then(|id| store.list(id));

    by_id
        .or_else(|| {
            store
                .lists()
                .iter()
                .find(|l| l.title.eq_ignore_ascii_case(key.trim()))
        })
        .ok_or_else(|| CorkboardError::NotFound(format!("list '{}'", key)))
}

fn parse_card_id(key: &str) -> Result<CardId> {
    key.parse::<CardId>()
        .map_err(|_| CorkboardError::Validation(format!("Invalid card id: {}", key)))
}

/// Locate a card by id on the open board
fn find_card(store: &BoardStore, key: &str) -> Result<CardSlot> {
    let card_id = parse_card_id(key)?;

    store
        .lists()
        .iter()
        .find_map(|list| {
            list.cards
                .iter()
                .position(|c| c.id == card_id)
                .map(|index| CardSlot::new(list.id, index))
        })
        .ok_or_else(|| CorkboardError::NotFound(format!("card '{}'", key)))
}

fn print_boards(dashboard: &Dashboard) {
    if dashboard.boards().is_empty() {
        println!("{}", style::dim("No boards yet. Create one with 'corkboard board create <title>'"));
        return;
    }

    println!("{}", style::header("Your Boards"));
    for board in dashboard.boards() {
        println!("  {} {}", style::id(board.id), board.title);
    }
}

fn print_board(store: &BoardStore) {
    if let Some(board) = store.board() {
        println!("{} {}", style::header(&board.title), style::id(board.id));
    }

    if store.lists().is_empty() {
        println!("{}", style::dim("  No lists yet"));
        return;
    }

    for list in store.lists() {
        println!();
        println!(
            "{} {} {}",
            style::subheader(&list.title),
            style::id(list.id),
            style::card_count(list.cards.len())
        );
        for card in &list.cards {
            println!("  {:>2}. {} {}", card.position, card.title, style::id(card.id));
            if let Some(ref description) = card.description {
                println!("      {}", style::dim(description));
            }
        }
    }
}

fn print_latest_activity(store: &BoardStore) {
    if let Some(activity) = store.activity().latest() {
        println!(
            "{} {}",
            style::activity_style(activity.kind),
            activity.description
        );
    }
}
