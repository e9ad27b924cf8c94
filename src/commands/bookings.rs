use clap::{Subcommand, ValueEnum};

use shortlist_core::{BookingDraft, BookingStore, BookingUpdate, ListingSnapshot, SavedBooking, Store};

use crate::config::Config;

#[derive(Clone, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum BookingCommand {
    /// Save a listing to your shortlist
    Save {
        /// Listing ID in the marketplace catalog
        listing_id: String,

        /// Listing title
        #[arg(long)]
        title: String,

        /// Price per night
        #[arg(long)]
        price: f64,

        /// Listing location
        #[arg(long)]
        location: String,

        /// Listing category (e.g. cabins, vehicles)
        #[arg(long)]
        category: String,

        /// Listing image URL
        #[arg(long)]
        image_url: Option<String>,

        /// Personal notes
        #[arg(long)]
        notes: Option<String>,

        /// Tags (can be repeated)
        #[arg(long = "tag", value_name = "TAG")]
        tags: Vec<String>,
    },

    /// List saved listings
    List {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,

        /// Only show one category
        #[arg(long)]
        category: Option<String>,
    },

    /// Show a saved listing's details
    Show {
        /// Listing ID
        listing_id: String,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Remove a listing from your shortlist
    Remove {
        /// Listing ID
        listing_id: String,
    },

    /// Update notes or tags on a saved listing
    Annotate {
        /// Listing ID
        listing_id: String,

        /// New notes
        #[arg(long)]
        notes: Option<String>,

        /// Replacement tags (can be repeated; replaces the existing set)
        #[arg(long = "tag", value_name = "TAG")]
        tags: Vec<String>,
    },

    /// Search saved listings
    Search {
        /// Query matched against title, location, category, notes and tags
        query: String,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Show statistics about your shortlist
    Stats {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },
}

impl BookingCommand {
    pub async fn run(&self, store: &Store, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
        let user_id = &config.user_id.value;

        match self {
            BookingCommand::Save {
                listing_id,
                title,
                price,
                location,
                category,
                image_url,
                notes,
                tags,
            } => {
                if title.trim().is_empty() {
                    return Err("Listing title cannot be empty".into());
                }

                let mut listing =
                    ListingSnapshot::new(listing_id, title.trim(), *price, location, category);
                if let Some(url) = image_url {
                    listing = listing.with_image_url(url);
                }

                let mut draft = BookingDraft::new(user_id, listing);
                if let Some(notes) = notes {
                    draft = draft.with_notes(notes);
                }
                if !tags.is_empty() {
                    draft = draft.with_tags(tags.clone());
                }

                let saved = store.save(draft).await?;
                println!("Saved listing:");
                println!("{}", saved);
                Ok(())
            }

            BookingCommand::List { format, category } => {
                let bookings = match category {
                    Some(category) => store.by_category(user_id, category).await?,
                    None => store.list(user_id).await?,
                };
                print_bookings(&bookings, format)
            }

            BookingCommand::Show { listing_id, format } => {
                let bookings = store.list(user_id).await?;
                let booking = bookings.iter().find(|b| b.listing_id() == listing_id);

                match booking {
                    Some(booking) => {
                        match format {
                            OutputFormat::Json => {
                                println!("{}", serde_json::to_string_pretty(booking)?);
                            }
                            OutputFormat::Text => {
                                println!("{}", booking);
                            }
                        }
                        Ok(())
                    }
                    None => Err(format!("Listing not saved: {}", listing_id).into()),
                }
            }

            BookingCommand::Remove { listing_id } => {
                if store.remove(user_id, listing_id).await? {
                    println!("Removed listing {}", listing_id);
                } else {
                    println!("Listing {} was not saved", listing_id);
                }
                Ok(())
            }

            BookingCommand::Annotate {
                listing_id,
                notes,
                tags,
            } => {
                let mut update = BookingUpdate::new();
                if let Some(notes) = notes {
                    update = update.with_notes(notes);
                }
                if !tags.is_empty() {
                    update = update.with_tags(tags.clone());
                }

                if update.is_empty() {
                    return Err("Nothing to update. Provide --notes or --tag.".into());
                }

                if store.update(user_id, listing_id, update).await? {
                    println!("Updated listing {}", listing_id);
                    Ok(())
                } else {
                    Err(format!("Listing not saved: {}", listing_id).into())
                }
            }

            BookingCommand::Search { query, format } => {
                let bookings = store.search(user_id, query).await?;
                print_bookings(&bookings, format)
            }

            BookingCommand::Stats { format } => {
                let stats = store.stats(user_id).await?;

                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(&stats)?);
                    }
                    OutputFormat::Text => {
                        println!("Shortlist for '{}'", user_id);
                        println!("Backend: {}", store.describe());
                        println!();
                        println!(
                            "Total: {} listing(s), {} saved in the last 7 days",
                            stats.total, stats.recent_count
                        );

                        if !stats.by_category.is_empty() {
                            println!("\nBy category:");
                            let mut categories: Vec<_> = stats.by_category.iter().collect();
                            categories.sort_by(|a, b| b.1.cmp(a.1).then(a.0.cmp(b.0)));
                            for (category, count) in categories {
                                println!("  {:<20} {}", category, count);
                            }
                        }

                        if !stats.by_location.is_empty() {
                            println!("\nBy location:");
                            let mut locations: Vec<_> = stats.by_location.iter().collect();
                            locations.sort_by(|a, b| b.1.cmp(a.1).then(a.0.cmp(b.0)));
                            for (location, count) in locations {
                                println!("  {:<20} {}", location, count);
                            }
                        }
                    }
                }
                Ok(())
            }
        }
    }
}

fn print_bookings(
    bookings: &[SavedBooking],
    format: &OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    if bookings.is_empty() {
        println!("No saved listings found");
        return Ok(());
    }

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(bookings)?);
        }
        OutputFormat::Text => {
            println!(
                "{:<16}  {:<30}  {:<12}  {:>10}  SAVED",
                "LISTING", "TITLE", "CATEGORY", "PRICE"
            );
            println!("{}", "-".repeat(86));
            for booking in bookings {
                let title = if booking.listing.title.len() > 30 {
                    format!("{}...", &booking.listing.title[..27])
                } else {
                    booking.listing.title.clone()
                };
                println!(
                    "{:<16}  {:<30}  {:<12}  {:>10.2}  {}",
                    booking.listing_id(),
                    title,
                    booking.listing.category,
                    booking.listing.price,
                    booking.saved_at.format("%Y-%m-%d")
                );
            }
            println!("\nTotal: {} listing(s)", bookings.len());
        }
    }
    Ok(())
}
