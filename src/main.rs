//! # Delegust
//!
//! A terminal task delegation and checklist manager written in Rust. Administrators delegate recurring or one-time tasks to staff, staff mark tasks complete (optionally with attachment evidence), and administrators review, approve, and report on completion.
//!
//! ## Features
//!
//! *   **Recurring Delegation**: one-time, daily, weekly, monthly, quarterly, yearly, and end-of-Nth-week-of-month schedules, expanded up front into concrete dated instances.
//! *   **Working-Day Calendar**: due dates snap forward to the closest configured working day; with no calendar configured, every day counts.
//! *   **Approval Workflow**: pending → awaiting approval → completed/rejected, with rejected tasks re-openable.
//! *   **Evidence**: tasks can require an attachment (photo path or URL) before completion is accepted.
//! *   **Reporting**: per-department completion counts.
//! *   **Data Persistence**: instances, calendar, and departments are stored in standard XDG data directories (JSON format).
//!
//! ## Installation
//!
//! ```bash
//! cargo install --path .
//! ```
//!
//! ## Usage
//!
//! **Delegating Tasks**
//! ```bash
//! # One-time task
//! delegust delegate "Fire-exit check" --desc "Walk all exits" --department Safety \
//!     --from alice --to bob --freq once --anchor 2025-09-01
//!
//! # Daily recurring task with required photo evidence
//! delegust delegate "Fridge temperature log" --desc "Photograph the gauge" \
//!     --department Kitchen --from alice --to bob --freq daily \
//!     --anchor 2025-09-01 --attachment-required
//!
//! # Due on the last Saturday of a month
//! delegust delegate "Stock take" --desc "Full inventory count" --department Store \
//!     --from alice --to bob --freq last-week --anchor-month 2025-09
//!
//! # Preview the schedule without saving
//! delegust delegate "Stock take" ... --preview
//! ```
//!
//! **Working Through Tasks**
//! ```bash
//! # List open instances (sorted by due date)
//! delegust list
//!
//! # Mark complete and submit for approval
//! delegust complete <ID> --remarks "Done" --attachment /photos/gauge.jpg
//!
//! # Review
//! delegust approve <ID>
//! delegust reject <ID> --remarks "Photo is blurry"
//! delegust reopen <ID>
//! ```
//!
//! **Calendar & Departments**
//! ```bash
//! delegust calendar add 2025-09-01 2025-09-02 2025-09-03
//! delegust calendar list
//! delegust department add Kitchen
//! ```
//!
//! **Reporting**
//! ```bash
//! delegust report
//! ```
//!
//! ## Data Storage
//!
//! Data is saved in your local data directory:
//! *   Linux: `~/.local/share/delegust/instances.json`
//! *   macOS: `~/Library/Application Support/delegust/instances.json`
//! *   Windows: `%APPDATA%\delegust\instances.json`
//!
//! You can override this by setting the `DELEGUST_DB` environment variable.

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use std::io;

use delegust::commands::*;

#[derive(Parser)]
#[command(name = "delegust")]
#[command(about = "Terminal task delegation and checklist manager", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Delegate a task, generating its dated instances
    Delegate {
        /// Task title (quoted if it has spaces)
        title: String,
        /// What the assignee is expected to do
        #[arg(short = 'D', long)]
        desc: String,
        /// Department the task belongs to
        #[arg(short, long)]
        department: String,
        /// Who is delegating the task
        #[arg(short, long)]
        from: String,
        /// Who carries the task out
        #[arg(short, long)]
        to: String,
        /// Frequency (once, daily, weekly, monthly, quarterly, yearly,
        /// 1st-week..4th-week, last-week)
        #[arg(short = 'F', long)]
        freq: String,
        /// Anchor date in YYYY-MM-DD (all frequencies except *-week)
        #[arg(short, long)]
        anchor: Option<String>,
        /// Anchor month in YYYY-MM (only for *-week frequencies)
        #[arg(short = 'm', long)]
        anchor_month: Option<String>,
        /// Remind the assignee before the due date
        #[arg(short, long)]
        reminders: bool,
        /// Require attachment evidence on completion
        #[arg(short = 'A', long)]
        attachment_required: bool,
        /// Show the generated schedule without saving
        #[arg(short, long)]
        preview: bool,
    },
    /// List task instances sorted by due date
    List {
        /// Include completed instances
        #[arg(short, long)]
        all: bool,
        /// Filter by status (pending, pending-approval, completed, rejected)
        #[arg(short, long)]
        status: Option<String>,
        /// Filter by assignee
        #[arg(short = 't', long)]
        assignee: Option<String>,
        /// Filter by department
        #[arg(short, long)]
        department: Option<String>,
    },
    /// Mark a task instance complete and submit it for approval
    Complete {
        id: u64,
        /// Completion notes
        #[arg(short, long)]
        remarks: Option<String>,
        /// Path or URL of the evidence
        #[arg(short, long)]
        attachment: Option<String>,
    },
    /// Approve a submitted task instance
    Approve {
        id: u64,
    },
    /// Reject a submitted task instance
    Reject {
        id: u64,
        /// Why it was rejected
        #[arg(short, long)]
        remarks: Option<String>,
    },
    /// Reopen a rejected task instance
    Reopen {
        id: u64,
    },
    /// Remove a task instance
    Remove {
        id: u64,
    },
    /// Manage the working-day calendar
    Calendar {
        #[command(subcommand)]
        command: CalendarCommands,
    },
    /// Manage the department list
    Department {
        #[command(subcommand)]
        command: DepartmentCommands,
    },
    /// Per-department completion report
    Report,
    /// Reset the database (delete all instances, calendar, departments)
    Reset {
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for (bash, zsh, fish, powershell, elvish)
        shell: String,
    },
}

#[derive(Subcommand)]
enum CalendarCommands {
    /// Add working days
    Add {
        /// Dates in YYYY-MM-DD
        #[arg(required = true)]
        dates: Vec<String>,
    },
    /// List working days
    List,
    /// Remove a working day
    Remove {
        /// Date in YYYY-MM-DD
        date: String,
    },
    /// Remove all working days
    Clear,
}

#[derive(Subcommand)]
enum DepartmentCommands {
    /// Add a department
    Add {
        /// Department name
        name: String,
    },
    /// List departments
    List,
    /// Remove a department
    Remove {
        /// Department name
        name: String,
    },
}

fn main() {
    let cli = Cli::parse();
    match cli.command {
        Commands::Delegate {
            title,
            desc,
            department,
            from,
            to,
            freq,
            anchor,
            anchor_month,
            reminders,
            attachment_required,
            preview,
        } => cmd_delegate(
            title,
            desc,
            department,
            from,
            to,
            freq,
            anchor,
            anchor_month,
            reminders,
            attachment_required,
            preview,
            false,
        ),
        Commands::List { all, status, assignee, department } => {
            cmd_list(all, status, assignee, department)
        }
        Commands::Complete { id, remarks, attachment } => {
            cmd_complete(id, remarks, attachment, false)
        }
        Commands::Approve { id } => cmd_approve(id, false),
        Commands::Reject { id, remarks } => cmd_reject(id, remarks, false),
        Commands::Reopen { id } => cmd_reopen(id, false),
        Commands::Remove { id } => cmd_remove(id, false),
        Commands::Calendar { command } => match command {
            CalendarCommands::Add { dates } => cmd_calendar_add(dates, false),
            CalendarCommands::List => cmd_calendar_list(),
            CalendarCommands::Remove { date } => cmd_calendar_remove(date, false),
            CalendarCommands::Clear => cmd_calendar_clear(false),
        },
        Commands::Department { command } => match command {
            DepartmentCommands::Add { name } => cmd_department_add(name, false),
            DepartmentCommands::List => cmd_department_list(),
            DepartmentCommands::Remove { name } => cmd_department_remove(name, false),
        },
        Commands::Report => cmd_report(),
        Commands::Reset { force } => cmd_reset(force),
        Commands::Completions { shell } => {
            let shell_enum = match shell.as_str() {
                "bash" => Shell::Bash,
                "zsh" => Shell::Zsh,
                "fish" => Shell::Fish,
                "powershell" => Shell::PowerShell,
                "elvish" => Shell::Elvish,
                _ => {
                    eprintln!("Unsupported shell: {}", shell);
                    return;
                }
            };
            let mut cmd = Cli::command();
            generate(shell_enum, &mut cmd, "delegust", &mut io::stdout());
        }
    }
}
