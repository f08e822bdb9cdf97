use anyhow::{Context, Result, bail};
use chawk_users::{BlackboardClient, CreateUserOutcome, NewUser, UpdateOutcome};
use clap::{Args, Subcommand};
use serde::Serialize;

#[derive(Subcommand)]
pub enum Command {
    /// Validate configuration and exit
    Check,
    /// Create a user account
    Create(CreateArgs),
    /// Exit 0 when the user exists, 1 when it does not
    Exists { username: String },
    /// Print a user's names and institution roles
    Get { username: String },
    /// Print the user name registered for an external id
    Resolve { external_id: String },
    /// Change the institution e-mail address
    SetInstitutionEmail { username: String, email: String },
    /// Change the e-mail address
    SetEmail { username: String, email: String },
    /// Not supported by this client; prints a warning
    Delete { username: String },
    /// Set availability to Yes, No or Disabled
    SetAvailability {
        username: String,
        availability: String,
    },
    /// Move a user to another data source
    SetDataSource {
        username: String,
        data_source_id: String,
    },
    /// Print the user's role in a course
    CourseRole { username: String, course_id: String },
    /// Replace the user's institution roles
    SetRoles {
        username: String,
        #[arg(required = true)]
        roles: Vec<String>,
    },
    /// List the courses a user is enrolled in
    Enrollments {
        username: String,
        /// Fail instead of printing an empty list when the lookup fails
        #[arg(long)]
        strict: bool,
    },
    /// Change given and/or family name
    SetName(SetNameArgs),
    /// Change the password
    SetPassword { username: String, password: String },
}

#[derive(Args)]
pub struct CreateArgs {
    pub username: String,
    #[arg(long)]
    pub first_name: String,
    #[arg(long)]
    pub last_name: String,
    #[arg(long, default_value = "")]
    pub email: String,
    #[arg(long, default_value = "")]
    pub password: String,
}

#[derive(Args)]
pub struct SetNameArgs {
    pub username: String,
    #[arg(long, default_value = "")]
    pub first_name: String,
    #[arg(long, default_value = "")]
    pub last_name: String,
}

/// Run one user command and print its result as JSON on stdout.
///
/// Returns whether the command succeeded; failures that come back as
/// outcomes are printed before `false` is returned.
#[allow(clippy::too_many_lines)]
pub async fn run(client: &BlackboardClient, command: Command) -> Result<bool> {
    let users = client.users();
    match command {
        Command::Check => {
            print_json(&"configuration is valid")?;
            Ok(true)
        }
        Command::Create(args) => {
            let outcome = users
                .create_user(&NewUser {
                    username: args.username,
                    first_name: args.first_name,
                    last_name: args.last_name,
                    email: args.email,
                    password: args.password,
                })
                .await
                .context("create user")?;
            print_json(&outcome)?;
            Ok(outcome == CreateUserOutcome::Created)
        }
        Command::Exists { username } => {
            let exists = users.user_exists(&username).await.context("user lookup")?;
            print_json(&exists)?;
            Ok(exists)
        }
        Command::Get { username } => {
            let user = users.get_user(&username).await.context("user lookup")?;
            print_json(&user)?;
            Ok(user.is_some())
        }
        Command::Resolve { external_id } => {
            let username = users
                .resolve_local_username(&external_id)
                .await
                .context("external id lookup")?;
            print_json(&username)?;
            Ok(!username.is_empty())
        }
        Command::SetInstitutionEmail { username, email } => updated(
            &users
                .update_institution_email(&username, &email)
                .await
                .context("update institution email")?,
        ),
        Command::SetEmail { username, email } => updated(
            &users
                .update_email(&username, &email)
                .await
                .context("update email")?,
        ),
        Command::Delete { username } => {
            print_json(&users.delete_user(&username))?;
            Ok(false)
        }
        Command::SetAvailability {
            username,
            availability,
        } => updated(
            &users
                .update_availability(&username, &availability)
                .await
                .context("update availability")?,
        ),
        Command::SetDataSource {
            username,
            data_source_id,
        } => updated(
            &users
                .update_data_source(&username, &data_source_id)
                .await
                .context("update data source")?,
        ),
        Command::CourseRole {
            username,
            course_id,
        } => {
            let role = users
                .get_course_role(&username, &course_id)
                .await
                .context("course role lookup")?;
            print_json(&role)?;
            Ok(true)
        }
        Command::SetRoles { username, roles } => updated(
            &users
                .add_institution_roles(&username, &roles)
                .await
                .context("update institution roles")?,
        ),
        Command::Enrollments { username, strict } => {
            let courses = if strict {
                users
                    .try_get_enrollments(&username)
                    .await
                    .context("enrollment lookup")?
            } else {
                users.get_enrollments(&username).await
            };
            print_json(&courses)?;
            Ok(true)
        }
        Command::SetName(args) => updated(
            &users
                .update_name(&args.username, &args.first_name, &args.last_name)
                .await
                .context("update name")?,
        ),
        Command::SetPassword { username, password } => updated(
            &users
                .update_password(&username, &password)
                .await
                .context("update password")?,
        ),
    }
}

fn updated(outcome: &UpdateOutcome) -> Result<bool> {
    print_json(outcome)?;
    Ok(outcome.is_updated())
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let rendered = serde_json::to_string_pretty(value).context("failed to render result")?;
    println!("{rendered}");
    Ok(())
}

/// Reject a command line that cannot be served before any network setup.
///
/// # Errors
/// Fails for commands this client cannot perform.
pub fn precheck(command: &Command) -> Result<()> {
    if let Command::SetRoles { roles, .. } = command
        && roles.iter().any(|r| r.trim().is_empty())
    {
        bail!("role ids must not be blank");
    }
    Ok(())
}
