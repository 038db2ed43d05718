use anyhow::{bail, Result};
use clap::{Args, Subcommand};

use marketplace::contract::error::MarketplaceError;
use marketplace::contract::model::{
    AuthRequest, ExperienceField, NewJob, ProfilePatch, Screen, SyncStatus, UserMode,
};
use marketplace::domain::error::DomainError;
use marketplace::domain::pending::ViewKind;
use marketplace::Session;

use crate::render;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show who is signed in, the current screen and the navigation bar
    Status,
    /// Sign in (demo accounts: user1 / user2, password toms1902)
    Login {
        email: String,
        password: String,
    },
    /// Create an account and sign in
    Signup(SignupArgs),
    /// Sign out
    Logout,
    /// Navigate to a screen (feed, profile, tracker, dashboard, create-job, inbox)
    Screen { name: Screen },
    /// Switch the guest mode toggle
    Mode { mode: UserMode },
    /// List job listings
    Jobs {
        /// Only listings owned by the signed-in employer
        #[arg(long)]
        mine: bool,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Post a new job listing (employers)
    PostJob(PostJobArgs),
    /// Message the employer of a listing (students)
    Message {
        #[arg(long)]
        job: String,
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },
    /// Messages received for your listings (employers)
    Inbox,
    /// View and edit the student profile
    Profile {
        #[command(subcommand)]
        action: ProfileCommand,
    },
    /// Draft a job description from a title (employers)
    Describe {
        #[arg(long)]
        title: String,
    },
    /// Toggle light/dark theme
    Theme,
    /// Check configuration
    Check,
    /// Interactive session; each line is one of these commands
    Repl,
}

#[derive(Args, Debug)]
pub struct SignupArgs {
    #[arg(long, default_value = "student")]
    pub mode: UserMode,
    pub email: String,
    pub password: String,
    /// Defaults to the password
    #[arg(long)]
    pub confirm: Option<String>,
    #[arg(long, default_value = "")]
    pub first_name: String,
    #[arg(long, default_value = "")]
    pub last_name: String,
    #[arg(long, default_value = "")]
    pub university: String,
    #[arg(long, default_value = "")]
    pub company: String,
}

#[derive(Args, Debug)]
pub struct PostJobArgs {
    #[arg(long)]
    pub title: String,
    #[arg(long)]
    pub location: String,
    /// YYYY-MM-DD
    #[arg(long)]
    pub deadline: String,
    /// Omit to draft one from the title
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long, default_value_t = 12.5)]
    pub salary_min: f64,
    #[arg(long, default_value_t = 15.0)]
    pub salary_max: f64,
    #[arg(long = "responsibility")]
    pub responsibilities: Vec<String>,
    #[arg(long = "skill")]
    pub skills: Vec<String>,
    #[arg(long, default_value = "")]
    pub contact: String,
}

#[derive(Subcommand, Debug)]
pub enum ProfileCommand {
    /// Print the profile
    Show,
    /// Change profile fields and save
    Set(ProfileSetArgs),
    /// Append a work experience entry and save
    AddExp {
        #[arg(long, default_value = "")]
        role: String,
        #[arg(long, default_value = "")]
        company: String,
        #[arg(long, default_value = "")]
        period: String,
    },
    /// Change one field of an experience entry and save
    EditExp {
        index: usize,
        field: ExperienceField,
        value: String,
    },
    /// Remove an experience entry and save
    RmExp { index: usize },
    /// Polish the bio and save
    Refine,
    /// Save and sync the current profile
    Save,
}

#[derive(Args, Debug, Default)]
pub struct ProfileSetArgs {
    #[arg(long)]
    pub first_name: Option<String>,
    #[arg(long)]
    pub last_name: Option<String>,
    #[arg(long)]
    pub dob: Option<String>,
    #[arg(long)]
    pub phone: Option<String>,
    #[arg(long)]
    pub university: Option<String>,
    #[arg(long)]
    pub degree: Option<String>,
    #[arg(long)]
    pub bio: Option<String>,
    #[arg(long)]
    pub portfolio: Option<String>,
    #[arg(long)]
    pub linkedin: Option<String>,
    /// Comma separated
    #[arg(long)]
    pub skills: Option<String>,
}

/// Run one command. Marketplace failures leave here as [`MarketplaceError`],
/// so internal details go to the log and not to the terminal.
pub async fn dispatch(session: &Session, command: Command) -> Result<()> {
    run(session, command).await.map_err(surface)
}

fn surface(err: anyhow::Error) -> anyhow::Error {
    match err.downcast::<DomainError>() {
        Ok(domain) => {
            if !domain.is_user_facing() {
                tracing::error!(error = %domain, "marketplace operation failed");
            }
            MarketplaceError::from(domain).into()
        }
        Err(other) => other,
    }
}

async fn run(session: &Session, command: Command) -> Result<()> {
    match command {
        Command::Status => render::status(&session.shell()),
        Command::Login { email, password } => {
            session.open_view(ViewKind::AuthModal);
            let screen = session.sign_in(AuthRequest::login(email, password)).await?;
            render::signed_in(&session.shell(), screen);
        }
        Command::Signup(args) => {
            session.open_view(ViewKind::AuthModal);
            let screen = session.sign_in(args.into_request()).await?;
            render::signed_in(&session.shell(), screen);
        }
        Command::Logout => {
            let screen = session.sign_out()?;
            println!("Signed out. Now on {screen}.");
        }
        Command::Screen { name } => {
            let shown = session.shell().request_screen(name);
            if shown != name {
                println!("'{name}' is not available here; showing {shown}.");
            }
            render::status(&session.shell());
        }
        Command::Mode { mode } => {
            let shown = session.shell().switch_mode(mode);
            println!("Mode {mode}; showing {shown}.");
        }
        Command::Jobs { mine, json } => {
            let shell = session.shell();
            let jobs: Vec<_> = if mine {
                if !shell.user().is_some_and(|u| u.is_employer()) {
                    bail!("--mine needs a signed-in employer");
                }
                shell.employer_jobs().into_iter().cloned().collect()
            } else {
                shell.feed_jobs().to_vec()
            };
            if json {
                println!("{}", serde_json::to_string_pretty(&jobs)?);
            } else {
                render::jobs(&jobs);
            }
        }
        Command::PostJob(args) => post_job(session, args).await?,
        Command::Message { job, text } => {
            session.open_job(&job)?;
            let sent = session.shell().send_message(&text.join(" "));
            session.dismiss_view(ViewKind::JobDetail);
            let msg = sent?;
            println!("Message sent to listing {} ({}).", msg.job_id, msg.id);
        }
        Command::Inbox => {
            let shell = session.shell();
            if !shell.user().is_some_and(|u| u.is_employer()) {
                bail!("the inbox is only available to signed-in employers");
            }
            render::inbox(&shell.inbox());
        }
        Command::Profile { action } => profile(session, action).await?,
        Command::Describe { title } => {
            session.open_view(ViewKind::CreateJob);
            let text = session.draft_description(&title).await?;
            println!("{text}");
        }
        Command::Theme => {
            let theme = session.shell().toggle_theme();
            println!("Theme: {theme:?}");
        }
        Command::Check | Command::Repl => bail!("not available from here"),
    }
    Ok(())
}

impl SignupArgs {
    fn into_request(self) -> AuthRequest {
        let confirm = self.confirm.unwrap_or_else(|| self.password.clone());
        AuthRequest {
            email: self.email,
            password: self.password,
            confirm_password: confirm,
            mode: self.mode,
            is_signup: true,
            first_name: self.first_name,
            last_name: self.last_name,
            university: self.university,
            company_name: self.company,
        }
    }
}

async fn post_job(session: &Session, args: PostJobArgs) -> Result<()> {
    session.shell().request_screen(Screen::CreateJob);
    session.open_view(ViewKind::CreateJob);

    let description = match args.description {
        Some(d) => d,
        None => {
            let drafted = session.draft_description(&args.title).await?;
            println!("Drafted description: {drafted}");
            drafted
        }
    };
    let job = NewJob {
        title: args.title,
        location: args.location,
        deadline: args.deadline,
        description,
        salary_min: args.salary_min,
        salary_max: args.salary_max,
        responsibilities: args.responsibilities,
        skills: args.skills,
        contact: args.contact,
    };

    let listing = session.submit_job(job).await?;
    println!("Posted {} ({}).", listing.title, listing.id);
    Ok(())
}

async fn profile(session: &Session, action: ProfileCommand) -> Result<()> {
    let mut profile = session.load_profile().await?;

    match action {
        ProfileCommand::Show => {
            render::profile(&profile);
            return Ok(());
        }
        ProfileCommand::Set(args) => {
            if let Some(skills) = &args.skills {
                profile.set_skills_from_csv(skills);
            }
            profile.apply(ProfilePatch {
                first_name: args.first_name,
                last_name: args.last_name,
                dob: args.dob,
                phone: args.phone,
                university: args.university,
                degree: args.degree,
                bio: args.bio,
                portfolio_url: args.portfolio,
                linked_in_url: args.linkedin,
            });
        }
        ProfileCommand::AddExp {
            role,
            company,
            period,
        } => {
            let i = profile.add_experience();
            profile.update_experience(i, ExperienceField::Role, role)?;
            profile.update_experience(i, ExperienceField::Company, company)?;
            profile.update_experience(i, ExperienceField::Period, period)?;
        }
        ProfileCommand::EditExp {
            index,
            field,
            value,
        } => profile.update_experience(index, field, value)?,
        ProfileCommand::RmExp { index } => {
            let removed = profile.remove_experience(index)?;
            println!("Removed '{}' at '{}'.", removed.role, removed.company);
        }
        ProfileCommand::Refine => {
            profile.bio = session.refine_bio(&profile.bio).await?;
            println!("Bio: {}", profile.bio);
        }
        ProfileCommand::Save => {}
    }

    let status = session.save_profile(&profile).await?;
    if let Some(notice) = session.shell().dismiss_notice() {
        println!("{}", notice.text);
    }
    if matches!(status, SyncStatus::Failed | SyncStatus::Abandoned) {
        println!("The profile is saved on this device only.");
    }
    Ok(())
}
