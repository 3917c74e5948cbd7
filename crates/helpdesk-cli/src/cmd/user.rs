use super::Ctx;
use crate::output::{print_json, print_table};
use clap::Subcommand;
use helpdesk_core::{
    activity::ActivityKind,
    user::{self, ProfilePatch, Role, User},
};

#[derive(Subcommand)]
pub enum UserSubcommand {
    /// Add a dashboard user
    Create {
        username: String,

        /// Display name (defaults to the username)
        #[arg(long)]
        name: Option<String>,

        /// super_admin | product_admin:<product>
        #[arg(long, default_value = "super_admin")]
        role: String,
    },

    /// List users
    List,

    /// Show a user's profile
    Show { username: String },

    /// Update a user's profile (empty --email/--phone clears the field)
    Update {
        username: String,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        email: Option<String>,

        #[arg(long)]
        phone: Option<String>,

        /// super_admin | product_admin:<product>
        #[arg(long)]
        role: Option<String>,
    },
}

pub fn run(ctx: &Ctx, subcommand: UserSubcommand) -> anyhow::Result<()> {
    let config = ctx.config()?;
    let root = &ctx.root;

    match subcommand {
        UserSubcommand::Create {
            username,
            name,
            role,
        } => {
            let role: Role = role.parse()?;
            let name = name.unwrap_or_else(|| username.clone());
            let u = user::create(root, username, name, role, ctx.now)?;
            if ctx.json {
                print_json(&u)?;
            } else {
                println!("created user {} ({})", u.username, u.role);
            }
            Ok(())
        }

        UserSubcommand::List => {
            let users = user::list(root)?;
            if ctx.json {
                return print_json(&users);
            }
            if users.is_empty() {
                println!("no users");
                return Ok(());
            }
            print_table(
                &["USERNAME", "NAME", "ROLE", "EMAIL"],
                users
                    .iter()
                    .map(|u| {
                        vec![
                            u.username.clone(),
                            u.display_name.clone(),
                            u.role.to_string(),
                            u.email.clone().unwrap_or_default(),
                        ]
                    })
                    .collect(),
            );
            Ok(())
        }

        UserSubcommand::Show { username } => {
            let u = user::get(root, &username)?;
            if ctx.json {
                return print_json(&u);
            }
            print_profile(&u);
            Ok(())
        }

        UserSubcommand::Update {
            username,
            name,
            email,
            phone,
            role,
        } => {
            let patch = ProfilePatch {
                display_name: name,
                email,
                phone,
                role: role.map(|r| r.parse::<Role>()).transpose()?,
            };
            let u = user::update_profile(root, &username, patch, ctx.now)?;
            ctx.record(&config, ActivityKind::ProfileUpdated, &u.username, "profile updated");
            if ctx.json {
                print_json(&u)?;
            } else {
                println!("updated user {}", u.username);
            }
            Ok(())
        }
    }
}

fn print_profile(u: &User) {
    println!("Username: {}", u.username);
    println!("Name:     {}", u.display_name);
    println!("Role:     {}", u.role);
    if let Some(email) = &u.email {
        println!("Email:    {email}");
    }
    if let Some(phone) = &u.phone {
        println!("Phone:    {phone}");
    }
    println!("Updated:  {}", u.updated_at.format("%Y-%m-%d %H:%M UTC"));
}
