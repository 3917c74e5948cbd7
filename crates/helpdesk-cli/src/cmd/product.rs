use super::Ctx;
use crate::output::{print_json, print_table, truncate};
use clap::Subcommand;
use helpdesk_core::{activity::ActivityKind, product, ticket};

#[derive(Subcommand)]
pub enum ProductSubcommand {
    /// Register a product (sub-brand)
    Create {
        /// Lowercase slug, e.g. acme-cloud
        slug: String,

        /// Display name (defaults to the slug)
        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        description: Option<String>,
    },

    /// List products with their ticket counts
    List,

    /// Delete a product that has no tickets
    Delete { slug: String },
}

pub fn run(ctx: &Ctx, subcommand: ProductSubcommand) -> anyhow::Result<()> {
    let config = ctx.config()?;
    let root = &ctx.root;

    match subcommand {
        ProductSubcommand::Create {
            slug,
            name,
            description,
        } => {
            let name = name.unwrap_or_else(|| slug.clone());
            let p = product::create(root, slug, name, description, ctx.now)?;
            ctx.record(&config, ActivityKind::ProductCreated, &p.slug, p.name.clone());
            if ctx.json {
                print_json(&p)?;
            } else {
                println!("created product {} ({})", p.slug, p.name);
            }
            Ok(())
        }

        ProductSubcommand::List => {
            let products = product::list(root)?;
            let tickets = ticket::load_all(root)?;
            let count = |slug: &str| tickets.iter().filter(|t| t.product == slug).count();

            if ctx.json {
                let rows: Vec<_> = products
                    .iter()
                    .map(|p| {
                        serde_json::json!({
                            "slug": p.slug,
                            "name": p.name,
                            "description": p.description,
                            "created_at": p.created_at,
                            "tickets": count(&p.slug),
                        })
                    })
                    .collect();
                return print_json(&rows);
            }
            if products.is_empty() {
                println!("no products");
                return Ok(());
            }
            print_table(
                &["SLUG", "NAME", "TICKETS", "DESCRIPTION"],
                products
                    .iter()
                    .map(|p| {
                        vec![
                            p.slug.clone(),
                            p.name.clone(),
                            count(&p.slug).to_string(),
                            truncate(p.description.as_deref().unwrap_or(""), 50),
                        ]
                    })
                    .collect(),
            );
            Ok(())
        }

        ProductSubcommand::Delete { slug } => {
            let p = product::delete(root, &slug)?;
            ctx.record(&config, ActivityKind::ProductDeleted, &p.slug, p.name.clone());
            if ctx.json {
                print_json(&p)?;
            } else {
                println!("deleted product {}", p.slug);
            }
            Ok(())
        }
    }
}
