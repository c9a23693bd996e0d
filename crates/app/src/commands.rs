use std::io::{self, BufRead, Write};

use api_types::expense::Expense;
use clap::{Args, Subcommand};
use client::{Client, Router, View};
use engine::{ExpenseDraft, LoginDraft, SignupDraft, Summary, UpdateDraft};

use crate::{
    error::{AppError, Result},
    notify, report,
};

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create an account and start a session.
    Register(RegisterArgs),
    /// Log in and store the session token.
    Login(LoginArgs),
    /// End the session.
    Logout,
    /// Show the logged-in account.
    Me,
    /// List all expenses.
    List,
    /// Add an expense.
    Add(AddArgs),
    /// Change some fields of an expense.
    Update(UpdateArgs),
    /// Delete an expense.
    Delete {
        id: String,
    },
    /// Totals, top categories and spending by category.
    Summary,
}

#[derive(Debug, Args)]
pub struct RegisterArgs {
    #[arg(long)]
    name: String,
    #[arg(long)]
    email: String,
    /// Prompted for when absent.
    #[arg(long, env = "EXPENSE_TRACKER_PASSWORD", hide_env_values = true)]
    password: Option<String>,
    /// Prompted for when absent.
    #[arg(long)]
    confirm_password: Option<String>,
}

#[derive(Debug, Args)]
pub struct LoginArgs {
    #[arg(long)]
    email: String,
    /// Prompted for when absent.
    #[arg(long, env = "EXPENSE_TRACKER_PASSWORD", hide_env_values = true)]
    password: Option<String>,
}

#[derive(Debug, Args)]
pub struct AddArgs {
    #[arg(long)]
    title: String,
    #[arg(long, allow_hyphen_values = true)]
    amount: String,
    /// One of Food, Transport, Shopping, Entertainment, Bills, Healthcare,
    /// Education, Other.
    #[arg(long)]
    category: String,
    /// YYYY-MM-DD, defaults to today.
    #[arg(long)]
    date: Option<String>,
}

#[derive(Debug, Args)]
pub struct UpdateArgs {
    id: String,
    #[arg(long)]
    title: Option<String>,
    #[arg(long, allow_hyphen_values = true)]
    amount: Option<String>,
    #[arg(long)]
    category: Option<String>,
    #[arg(long)]
    date: Option<String>,
}

impl Command {
    fn view(&self) -> View {
        match self {
            Self::Register(_) => View::Signup,
            Self::Login(_) | Self::Logout => View::Login,
            Self::Me => View::Account,
            Self::List | Self::Add(_) | Self::Update(_) | Self::Delete { .. } | Self::Summary => {
                View::Home
            }
        }
    }
}

pub async fn run(client: &Client, router: &Router, command: Command) -> Result<()> {
    let view = command.view();
    if router.open(view, client.session()).await != view {
        return Err(AppError::NotLoggedIn);
    }
    tracing::debug!("running on the {} view", view.label());

    match command {
        Command::Register(args) => register(client, router, args).await,
        Command::Login(args) => login(client, router, args).await,
        Command::Logout => {
            client.auth().logout().await;
            notify::success("Logged out");
            Ok(())
        }
        Command::Me => {
            let user = client
                .auth()
                .me()
                .await
                .map_err(AppError::failed("Failed to load account"))?;
            println!("{}", report::account(user.as_ref()));
            Ok(())
        }
        Command::List => {
            let expenses = fetch_expenses(client).await?;
            println!("{}", report::expense_list(&expenses));
            Ok(())
        }
        Command::Add(args) => {
            let payload = ExpenseDraft {
                title: args.title,
                amount: args.amount,
                category: args.category,
                date: args.date.unwrap_or_else(today),
            }
            .validate()?;
            client
                .expenses()
                .create(&payload)
                .await
                .map_err(AppError::failed("Failed to add expense"))?;
            notify::success("Expense added successfully!");
            refresh(client).await
        }
        Command::Update(args) => {
            let changes = UpdateDraft {
                title: args.title,
                amount: args.amount,
                category: args.category,
                date: args.date,
            }
            .validate()?;
            client
                .expenses()
                .update(&args.id, &changes)
                .await
                .map_err(AppError::failed("Failed to update expense"))?;
            notify::success("Expense updated successfully!");
            refresh(client).await
        }
        Command::Delete { id } => {
            client
                .expenses()
                .delete(&id)
                .await
                .map_err(AppError::failed("Failed to delete expense"))?;
            notify::success("Expense deleted successfully!");
            refresh(client).await
        }
        Command::Summary => {
            let expenses = fetch_expenses(client).await?;
            println!("{}", report::summary(&Summary::from_expenses(&expenses)));
            Ok(())
        }
    }
}

async fn register(client: &Client, router: &Router, args: RegisterArgs) -> Result<()> {
    let password = match args.password {
        Some(password) => password,
        None => prompt_secret("Password")?,
    };
    let confirm_password = match args.confirm_password {
        Some(confirm) => confirm,
        None => prompt_secret("Confirm password")?,
    };
    let payload = SignupDraft {
        name: args.name,
        email: args.email,
        password,
        confirm_password,
    }
    .validate()?;

    let response = client.auth().register(&payload).await.map_err(|err| {
        let message = err
            .server_message()
            .map(str::to_string)
            .unwrap_or_else(|| "Failed to create account".to_string());
        AppError::failed(format!("Signup failed: {message}"))(err)
    })?;

    notify::success("Account created. Welcome!");
    if response.token.is_some() {
        router.navigate(View::Home).await;
    }
    Ok(())
}

async fn login(client: &Client, router: &Router, args: LoginArgs) -> Result<()> {
    let password = match args.password {
        Some(password) => password,
        None => prompt_secret("Password")?,
    };
    let payload = LoginDraft {
        email: args.email,
        password,
    }
    .validate()?;

    let response = client.auth().login(&payload).await.map_err(|err| {
        let message = err
            .server_message()
            .map(str::to_string)
            .unwrap_or_else(|| "Invalid credentials".to_string());
        AppError::failed(format!("Login failed: {message}"))(err)
    })?;

    if response.token.is_none() {
        tracing::warn!("login succeeded without a token");
    }
    notify::success("Welcome back, login successful");
    router.navigate(View::Home).await;
    Ok(())
}

/// Re-fetches the list after a change, like the home view does.
async fn refresh(client: &Client) -> Result<()> {
    let expenses = fetch_expenses(client).await?;
    println!("{}", report::expense_list(&expenses));
    Ok(())
}

async fn fetch_expenses(client: &Client) -> Result<Vec<Expense>> {
    client.expenses().list().await.map_err(AppError::failed(format!(
        "Failed to fetch expenses. Make sure your backend is running on {}",
        client.transport().base_url()
    )))
}

fn today() -> String {
    chrono::Local::now().date_naive().format("%Y-%m-%d").to_string()
}

fn prompt_secret(label: &str) -> Result<String> {
    print!("{label}: ");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}
