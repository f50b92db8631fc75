use std::{error::Error, io::Write};

use clap::{Args, Parser, Subcommand};
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    execute,
    style::Print,
    terminal,
    terminal::ClearType,
};
use engine::{AccountCmd, Engine, RegisterUserCmd, Won};
use migration::MigratorTrait;
use sea_orm::{Database, DatabaseConnection};

#[derive(Parser, Debug)]
#[command(name = "moim_admin")]
#[command(about = "Admin utilities for moim (bootstrap users, bank accounts, schema)")]
struct Cli {
    /// Database connection string (also read from `DATABASE_URL`).
    #[arg(long, env = "DATABASE_URL", default_value = "sqlite:./moim.db?mode=rwc")]
    database_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    User(User),
    Account(Account),
    /// Run schema migrations.
    Db(Db),
}

#[derive(Args, Debug)]
struct User {
    #[command(subcommand)]
    command: UserCommand,
}

#[derive(Subcommand, Debug)]
enum UserCommand {
    Create(UserCreateArgs),
}

#[derive(Args, Debug)]
struct UserCreateArgs {
    #[arg(long)]
    username: String,
    #[arg(long)]
    nickname: String,
    #[arg(long)]
    email: String,
}

#[derive(Args, Debug)]
struct Account {
    #[command(subcommand)]
    command: AccountCommand,
}

#[derive(Subcommand, Debug)]
enum AccountCommand {
    Set(AccountSetArgs),
}

#[derive(Args, Debug)]
struct AccountSetArgs {
    #[arg(long)]
    username: String,
    #[arg(long)]
    bank: String,
    #[arg(long)]
    number: String,
    /// Opening balance in won, e.g. `120,000`.
    #[arg(long, value_parser = parse_won)]
    balance: Won,
}

#[derive(Args, Debug)]
struct Db {
    #[command(subcommand)]
    command: DbCommand,
}

#[derive(Subcommand, Debug)]
enum DbCommand {
    Up,
    Down,
    /// Drop everything and re-apply all migrations.
    Fresh,
    Status,
}

fn parse_won(raw: &str) -> Result<Won, String> {
    raw.parse::<Won>().map_err(|err| err.to_string())
}

struct RawModeGuard;

impl RawModeGuard {
    fn enter() -> Result<Self, Box<dyn Error + Send + Sync>> {
        terminal::enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

fn prompt_password(prompt: &str) -> Result<String, Box<dyn Error + Send + Sync>> {
    let _raw = RawModeGuard::enter()?;

    let mut out = std::io::stderr();
    execute!(
        out,
        cursor::MoveToColumn(0),
        terminal::Clear(ClearType::CurrentLine),
        Print(prompt)
    )?;
    out.flush()?;

    let mut buf = String::new();
    loop {
        let Event::Key(KeyEvent {
            code, modifiers, ..
        }) = event::read()?
        else {
            continue;
        };

        match code {
            KeyCode::Enter => {
                execute!(out, Print("\r\n"))?;
                out.flush()?;
                break;
            }
            KeyCode::Backspace => {
                if buf.pop().is_some() {
                    execute!(out, cursor::MoveLeft(1), Print(" "), cursor::MoveLeft(1))?;
                    out.flush()?;
                }
            }
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                execute!(out, Print("\r\n"))?;
                out.flush()?;
                return Err("interrupted".into());
            }
            KeyCode::Char(ch) if !modifiers.contains(KeyModifiers::CONTROL) => {
                buf.push(ch);
                execute!(out, Print("*"))?;
                out.flush()?;
            }
            _ => {}
        }
    }

    Ok(buf)
}

fn prompt_password_twice() -> Result<String, Box<dyn Error + Send + Sync>> {
    let mut out = std::io::stderr();
    for _ in 0..3 {
        let p1 = prompt_password("Password: ")?;
        if p1.is_empty() {
            execute!(
                out,
                cursor::MoveToColumn(0),
                terminal::Clear(ClearType::CurrentLine),
                Print("Password must not be empty.\r\n")
            )?;
            continue;
        }

        let p2 = prompt_password("Confirm password: ")?;
        if p1 == p2 {
            return Ok(p1);
        }

        execute!(
            out,
            cursor::MoveToColumn(0),
            terminal::Clear(ClearType::CurrentLine),
            Print("Passwords do not match. Try again.\r\n")
        )?;
    }

    Err("too many attempts".into())
}

async fn connect_db(
    database_url: &str,
) -> Result<DatabaseConnection, Box<dyn Error + Send + Sync>> {
    let db = Database::connect(database_url).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

async fn run_db(database_url: &str, command: DbCommand) -> Result<(), Box<dyn Error + Send + Sync>> {
    let db = Database::connect(database_url).await?;
    match command {
        DbCommand::Up => migration::Migrator::up(&db, None).await?,
        DbCommand::Down => migration::Migrator::down(&db, None).await?,
        DbCommand::Fresh => migration::Migrator::fresh(&db).await?,
        DbCommand::Status => migration::Migrator::status(&db).await?,
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let cli = Cli::parse();

    match cli.command {
        Command::Db(Db { command }) => run_db(&cli.database_url, command).await?,
        Command::User(User {
            command: UserCommand::Create(args),
        }) => {
            let db = connect_db(&cli.database_url).await?;
            let engine = Engine::builder().database(db).build().await?;
            let password = prompt_password_twice()?;

            match engine
                .register_user(RegisterUserCmd::new(
                    &args.username,
                    password,
                    args.nickname,
                    args.email,
                ))
                .await
            {
                Ok(username) => println!("created user: {username}"),
                Err(err) => {
                    eprintln!("{err}");
                    std::process::exit(1);
                }
            }
        }
        Command::Account(Account {
            command: AccountCommand::Set(args),
        }) => {
            let db = connect_db(&cli.database_url).await?;
            let engine = Engine::builder().database(db).build().await?;

            if let Err(err) = engine
                .set_account(
                    &args.username,
                    AccountCmd::new(&args.bank, &args.number, args.balance.amount()),
                )
                .await
            {
                eprintln!("{err}");
                std::process::exit(1);
            }
            println!(
                "set account of {}: {} {} ({})",
                args.username, args.bank, args.number, args.balance
            );
        }
    }

    Ok(())
}
