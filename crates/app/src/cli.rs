//! Terminal front end
//!
//! Subcommands map one-to-one onto view model operations:
//! - `signup`, `login`, `logout`, `whoami` - session lifecycle
//! - `feed`, `top-skills`, `search`, `like` - the dashboard
//! - `skill`, `profile`, `experience` - the signed-in user's own content
//! - `admin` - top-skill curation and user management
//! - `watch` - keep the feed live and print sync events

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use skillzone_core::{
    linkify, Experience, ExperienceDraft, ProfileUpdate, SearchCategory, Segment, SignupForm,
    Skill, SkillDraft, TopSkill, Upload, UserProfile, UserSummary,
};
use tokio::sync::mpsc;

use crate::confirm::Confirm;
use crate::events::SyncEvent;
use crate::mutation::DeleteOutcome;
use crate::poller::spawn_top_skills_refresh;
use crate::state::AppState;
use crate::viewmodel::{
    AdminViewModel, AuthViewModel, FeedViewModel, ProfileViewModel, RenameOutcome, SearchOutcome,
    SearchStatus, SearchViewModel,
};

#[derive(Parser, Debug)]
#[command(name = "skillzone")]
#[command(author, version, about = "Terminal client for Skillzone", long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "skillzone.toml")]
    pub config: PathBuf,

    /// API base URL (overrides the configuration file)
    #[arg(long, env = "SKILLZONE_API_URL")]
    pub api_url: Option<String>,

    /// Override log level
    #[arg(short, long)]
    pub log_level: Option<String>,

    /// Answer yes to every confirmation prompt
    #[arg(short, long)]
    pub yes: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create an account
    Signup {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        branch: Option<String>,
        #[arg(long)]
        bio: Option<String>,
        /// Profile picture
        #[arg(long)]
        image: Option<PathBuf>,
    },

    /// Sign in with email and password, or adopt a raw credential
    Login {
        #[arg(long, required_unless_present = "credential")]
        email: Option<String>,
        #[arg(long, required_unless_present = "credential")]
        password: Option<String>,
        #[arg(long, conflicts_with_all = ["email", "password"])]
        credential: Option<String>,
    },

    /// Forget the stored credential
    Logout,

    /// Show the current role
    Whoami,

    /// List every skill, newest first
    Feed {
        /// Narrow the feed to a top skill
        #[arg(long)]
        top_skill: Option<String>,
    },

    /// List the top skills
    TopSkills,

    /// Search skills on the server, most liked first
    Search { query: String },

    /// Like or unlike a skill from the feed
    Like { id: String },

    /// Manage your own skills
    #[command(subcommand)]
    Skill(SkillCommands),

    /// Show or update profiles
    #[command(subcommand)]
    Profile(ProfileCommands),

    /// Manage your experiences
    #[command(subcommand)]
    Experience(ExperienceCommands),

    /// Administration (requires the admin credential)
    #[command(subcommand)]
    Admin(AdminCommands),

    /// Keep the feed live and print sync events until interrupted
    Watch,
}

#[derive(Subcommand, Debug)]
pub enum SkillCommands {
    /// List your skills
    List,
    /// Create a skill
    Add {
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: String,
        #[arg(long)]
        tool: Option<String>,
        #[arg(long)]
        image: Option<PathBuf>,
    },
    /// Edit an existing skill; omitted fields keep their current value
    Edit {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        tool: Option<String>,
        #[arg(long)]
        image: Option<PathBuf>,
    },
    /// Delete a skill
    Delete { id: String },
}

#[derive(Subcommand, Debug)]
pub enum ProfileCommands {
    /// Show your profile, or another user's page
    Show { username: Option<String> },
    /// Update your profile; omitted fields keep their current value
    Update {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        branch: Option<String>,
        #[arg(long)]
        password: Option<String>,
        #[arg(long)]
        bio: Option<String>,
        #[arg(long)]
        image: Option<PathBuf>,
    },
}

#[derive(Subcommand, Debug)]
pub enum ExperienceCommands {
    List,
    Add {
        text: String,
        #[arg(long)]
        image: Option<PathBuf>,
    },
    Delete { id: String },
}

#[derive(Subcommand, Debug)]
pub enum AdminCommands {
    /// List top skills
    TopSkills {
        #[arg(long)]
        filter: Option<String>,
    },
    AddSkill { name: String },
    DeleteSkill { name: String },
    RenameSkill { old: String, new: String },
    /// List users
    Users {
        #[arg(long)]
        filter: Option<String>,
        /// Match the filter against `skill` titles or `tool` names
        #[arg(long, default_value = "skill")]
        category: SearchCategory,
    },
    /// Show one user's details
    User { name: String },
    DeleteUser { name: String },
}

/// Everything a command handler needs
pub struct Frontend {
    state: Arc<AppState>,
    confirm: Box<dyn Confirm>,
    auth: AuthViewModel,
    feed: FeedViewModel,
    search: SearchViewModel,
    profile: ProfileViewModel,
    admin: AdminViewModel,
}

impl Frontend {
    pub fn new(state: Arc<AppState>, confirm: Box<dyn Confirm>) -> Self {
        Self {
            auth: AuthViewModel::new(state.clone()),
            feed: FeedViewModel::new(state.clone()),
            search: SearchViewModel::new(state.clone()),
            profile: ProfileViewModel::new(state.clone()),
            admin: AdminViewModel::new(state.clone()),
            state,
            confirm,
        }
    }

    pub async fn run(&self, command: Commands, events: mpsc::UnboundedReceiver<SyncEvent>) -> Result<()> {
        match command {
            Commands::Signup {
                name,
                email,
                password,
                branch,
                bio,
                image,
            } => {
                let form = SignupForm {
                    name,
                    email,
                    password,
                    college_branch: branch,
                    bio,
                    image: load_upload(image.as_deref())?,
                };
                self.auth.signup(&form).await?;
                println!("Account created, sign in with `skillzone login`");
            }
            Commands::Login {
                email,
                password,
                credential,
            } => {
                let role = match credential {
                    Some(credential) => self.auth.login_with_credential(&credential)?,
                    None => {
                        let email = email.unwrap_or_default();
                        let password = password.unwrap_or_default();
                        self.auth.login(&email, &password).await?
                    }
                };
                println!("Signed in as {}", role.label());
            }
            Commands::Logout => {
                self.auth.logout();
                println!("Signed out");
            }
            Commands::Whoami => match self.auth.role() {
                Some(role) => println!("{}", role.label()),
                None => println!("Not signed in"),
            },
            Commands::Feed { top_skill } => {
                self.feed.refresh_skills().await;
                if let Some(name) = top_skill {
                    self.feed.select_top_skill(&name).await;
                }
                print_skills(&self.feed.visible().await);
            }
            Commands::TopSkills => {
                print_top_skills(&self.feed.refresh_top_skills().await);
            }
            Commands::Search { query } => match self.search.search(&query).await {
                SearchOutcome::Shown(SearchStatus::Failed { message, .. }) => {
                    bail!("Search failed: {}", message)
                }
                _ => print_skills(&self.search.results().await),
            },
            Commands::Like { id } => {
                self.feed.refresh_skills().await;
                let likes = self.feed.toggle_like(&id).await?;
                println!(
                    "{} like{} ({})",
                    likes.likes,
                    if likes.likes == 1 { "" } else { "s" },
                    if likes.has_liked { "liked" } else { "not liked" }
                );
            }
            Commands::Skill(cmd) => self.run_skill(cmd).await?,
            Commands::Profile(cmd) => self.run_profile(cmd).await?,
            Commands::Experience(cmd) => self.run_experience(cmd).await?,
            Commands::Admin(cmd) => self.run_admin(cmd).await?,
            Commands::Watch => self.watch(events).await?,
        }
        Ok(())
    }

    async fn run_skill(&self, cmd: SkillCommands) -> Result<()> {
        match cmd {
            SkillCommands::List => {
                self.profile.refresh_skills().await;
                print_skills(&self.profile.skills().await);
            }
            SkillCommands::Add {
                title,
                description,
                tool,
                image,
            } => {
                let mut draft = SkillDraft::new(title, description);
                draft.tool = tool;
                draft.image = load_upload(image.as_deref())?;
                self.profile.save_skill(&draft).await?;
                println!("Skill created");
            }
            SkillCommands::Edit {
                id,
                title,
                description,
                tool,
                image,
            } => {
                let mut draft = self.profile.edit_skill(&id).await?;
                if let Some(title) = title {
                    draft.title = title;
                }
                if let Some(description) = description {
                    draft.description = description;
                }
                if tool.is_some() {
                    draft.tool = tool;
                }
                draft.image = load_upload(image.as_deref())?;
                self.profile.save_skill(&draft).await?;
                println!("Skill updated");
            }
            SkillCommands::Delete { id } => {
                let outcome = self.profile.delete_skill(self.confirm.as_ref(), &id).await?;
                report_delete(outcome, "Skill");
            }
        }
        Ok(())
    }

    async fn run_profile(&self, cmd: ProfileCommands) -> Result<()> {
        match cmd {
            ProfileCommands::Show { username: Some(username) } => {
                let page = self.profile.view_user(&username).await?;
                print_profile(&page.profile);
                print_experiences(&page.experiences);
            }
            ProfileCommands::Show { username: None } => {
                self.profile.load().await;
                let profile = self
                    .profile
                    .profile()
                    .await
                    .context("Profile could not be loaded")?;
                print_profile(&profile);
                println!();
                print_skills(&self.profile.skills().await);
                print_experiences(&self.profile.experiences().await);
            }
            ProfileCommands::Update {
                name,
                email,
                branch,
                password,
                bio,
                image,
            } => {
                let current = self
                    .profile
                    .refresh_profile()
                    .await
                    .context("Profile could not be loaded")?;
                let mut update = ProfileUpdate::from_profile(&current);
                if let Some(name) = name {
                    update.name = name;
                }
                if let Some(email) = email {
                    update.email = email;
                }
                if let Some(branch) = branch {
                    update.college_branch = branch;
                }
                if bio.is_some() {
                    update.bio = bio;
                }
                update.password = password;
                update.image = load_upload(image.as_deref())?;

                self.profile.update_profile(&update).await?;
                println!("Profile updated");
            }
        }
        Ok(())
    }

    async fn run_experience(&self, cmd: ExperienceCommands) -> Result<()> {
        match cmd {
            ExperienceCommands::List => {
                self.profile.refresh_experiences().await;
                print_experiences(&self.profile.experiences().await);
            }
            ExperienceCommands::Add { text, image } => {
                let mut draft = ExperienceDraft::new(text);
                draft.image = load_upload(image.as_deref())?;
                self.profile.add_experience(&draft).await?;
                println!("Experience added");
            }
            ExperienceCommands::Delete { id } => {
                let outcome = self
                    .profile
                    .delete_experience(self.confirm.as_ref(), &id)
                    .await?;
                report_delete(outcome, "Experience");
            }
        }
        Ok(())
    }

    async fn run_admin(&self, cmd: AdminCommands) -> Result<()> {
        match cmd {
            AdminCommands::TopSkills { filter } => {
                self.admin.load_top_skills().await?;
                let term = filter.unwrap_or_default();
                print_top_skills(&self.admin.filtered_top_skills(&term).await);
            }
            AdminCommands::AddSkill { name } => {
                self.admin.add_top_skill(&name).await?;
                println!("Skill \"{}\" has been successfully added.", name.trim());
            }
            AdminCommands::DeleteSkill { name } => {
                let outcome = self
                    .admin
                    .delete_top_skill(self.confirm.as_ref(), &name)
                    .await?;
                report_delete(outcome, "Skill");
            }
            AdminCommands::RenameSkill { old, new } => {
                match self
                    .admin
                    .rename_top_skill(self.confirm.as_ref(), &old, &new)
                    .await?
                {
                    RenameOutcome::Renamed => println!(
                        "Skill successfully updated from \"{}\" to \"{}\".",
                        old,
                        new.trim()
                    ),
                    RenameOutcome::Unchanged => println!("Nothing to change"),
                    RenameOutcome::Declined => println!("Cancelled"),
                }
            }
            AdminCommands::Users { filter, category } => {
                self.admin.load_users().await?;
                let term = filter.unwrap_or_default();
                for user in self.admin.filtered_users(&term, category).await {
                    println!("{}  {} <{}>", user.id, user.name, user.email);
                }
            }
            AdminCommands::User { name } => {
                let user = self.admin.select_user(&name).await?;
                print_user(&user);
            }
            AdminCommands::DeleteUser { name } => {
                let user = self.admin.select_user(&name).await?;
                let outcome = self.admin.delete_user(self.confirm.as_ref(), &user).await?;
                report_delete(outcome, "User");
            }
        }
        Ok(())
    }

    /// Load the feed, start the poller, and print events until Ctrl-C or session expiry
    async fn watch(&self, mut events: mpsc::UnboundedReceiver<SyncEvent>) -> Result<()> {
        self.feed.load().await;
        let period = self.state.config().sync.top_skills_refresh();
        let poller = spawn_top_skills_refresh(self.feed.clone(), period);

        loop {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => break,
                event = events.recv() => {
                    let Some(event) = event else { break };
                    let expired = event == SyncEvent::SessionExpired;
                    print_event(&event);
                    if expired {
                        break;
                    }
                }
            }
        }

        poller.abort();
        Ok(())
    }
}

fn load_upload(path: Option<&Path>) -> Result<Option<Upload>> {
    path.map(|p| {
        Upload::from_path(p).with_context(|| format!("Failed to read image {}", p.display()))
    })
    .transpose()
}

fn report_delete(outcome: DeleteOutcome, what: &str) {
    match outcome {
        DeleteOutcome::Deleted => println!("{} deleted", what),
        DeleteOutcome::Declined => println!("Cancelled"),
    }
}

/// Flatten linkified text for a terminal: links keep their text, with the href appended when they differ
pub fn render_text(text: &str) -> String {
    linkify(text)
        .into_iter()
        .map(|segment| match segment {
            Segment::Text(text) => text,
            Segment::Link { text, href } if text == href => text,
            Segment::Link { text, href } => format!("{} <{}>", text, href),
        })
        .collect()
}

fn print_skills(skills: &[Skill]) {
    if skills.is_empty() {
        println!("No skills found");
        return;
    }
    for skill in skills {
        let author = skill.username.as_deref().unwrap_or("unknown");
        let heart = if skill.has_liked { "*" } else { " " };
        println!("{} {}  [{}] {} likes, by {}", heart, skill.title, skill.id, skill.likes, author);
        if let Some(tool) = &skill.tool {
            println!("    tool: {}", tool);
        }
        println!("    {}", render_text(&skill.description));
    }
}

fn print_top_skills(skills: &[TopSkill]) {
    for skill in skills {
        println!("{}", skill.name);
    }
}

fn print_profile(profile: &UserProfile) {
    println!("{} <{}>", profile.name, profile.email);
    if let Some(branch) = &profile.college_branch {
        println!("Branch: {}", branch);
    }
    if let Some(bio) = &profile.bio {
        println!("{}", render_text(bio));
    }
}

fn print_experiences(experiences: &[Experience]) {
    if experiences.is_empty() {
        println!("No experiences");
        return;
    }
    for experience in experiences {
        println!("- [{}] {}", experience.id, render_text(&experience.text));
    }
}

fn print_user(user: &UserSummary) {
    println!("{} <{}>  ({})", user.name, user.email, user.id);
    if let Some(branch) = &user.college_branch {
        println!("Branch: {}", branch);
    }
    if let Some(bio) = &user.bio {
        println!("{}", render_text(bio));
    }
    println!("Skills: {}", user.skills.join(", "));
    println!("Tools: {}", user.tools.join(", "));
}

fn print_event(event: &SyncEvent) {
    match event {
        SyncEvent::SessionStarted(role) => println!("Signed in as {}", role.label()),
        SyncEvent::SessionEnded => println!("Signed out"),
        SyncEvent::SessionExpired => println!("Session expired, please sign in again"),
        SyncEvent::FeedUpdated { count } => println!("Feed: {} skills", count),
        SyncEvent::SkillUpdated { id, likes } => println!("Skill {}: {} likes", id, likes.likes),
        SyncEvent::TopSkillsUpdated(skills) => {
            let names: Vec<&str> = skills.iter().map(|s| s.name.as_str()).collect();
            println!("Top skills: {}", names.join(", "));
        }
        SyncEvent::SearchChanged(status) => println!("Search: {:?}", status),
        SyncEvent::ProfileUpdated => println!("Profile updated"),
        SyncEvent::ExperiencesUpdated { count } => println!("Experiences: {}", count),
        SyncEvent::UsersUpdated { count } => println!("Users: {}", count),
        SyncEvent::Notice(message) => eprintln!("{}", message),
    }
}
