use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use storefront_core::{ColorOption, NewProduct, ProductField, UpiField};

#[derive(Parser, Debug)]
#[command(
    name = "storefront-admin",
    version,
    about = "Edit the storefront catalog and UPI payment settings"
)]
pub struct Cli {
    /// Storefront API base URL; overrides the config file and STOREFRONT_API_URL.
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// TOML file with `base_url` and `timeout_secs`.
    #[arg(long, global = true, env = "STOREFRONT_ADMIN_CONFIG")]
    pub config: Option<PathBuf>,

    /// Approve every confirmation without asking.
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Catalog products.
    #[command(subcommand)]
    Products(ProductCommand),

    /// UPI payee settings.
    #[command(subcommand)]
    Upi(UpiCommand),

    /// Shows the payment providers the checkout page offers.
    PaymentOptions,

    /// Interactive list view over one collection.
    Shell {
        #[arg(value_enum)]
        collection: CollectionArg,
    },
}

#[derive(Subcommand, Debug)]
pub enum ProductCommand {
    List,
    Show {
        id: String,
    },
    /// Sets one field, e.g. `edit p1 sizes "S, L, XL"`.
    Edit {
        id: String,
        field: ProductField,
        value: String,
    },
    Delete {
        id: String,
    },
    Add(AddProductArgs),
}

#[derive(Subcommand, Debug)]
pub enum UpiCommand {
    List,
    Show {
        id: String,
    },
    /// Sets one field; `payment_options` takes the enabled provider keys.
    Edit {
        id: String,
        field: UpiField,
        value: String,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum CollectionArg {
    Products,
    Upi,
}

#[derive(Args, Debug)]
pub struct AddProductArgs {
    #[arg(long)]
    pub id: String,
    #[arg(long)]
    pub image: String,
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub mrp: String,
    #[arg(long)]
    pub selling_price: String,
    #[arg(long, default_value = "")]
    pub description: String,
    /// Comma separated, e.g. "S, M, L".
    #[arg(long, default_value = "")]
    pub sizes: String,
    #[arg(long, default_value = "")]
    pub variant: String,
    /// Comma separated image paths.
    #[arg(long, default_value = "")]
    pub carousel_images: String,
    /// `Name=image`; repeat for each color.
    #[arg(long = "color", value_parser = parse_color)]
    pub colors: Vec<ColorOption>,
    #[arg(long)]
    pub assured_image: Option<String>,
}

impl From<AddProductArgs> for NewProduct {
    fn from(args: AddProductArgs) -> Self {
        NewProduct {
            id: args.id,
            image: args.image,
            name: args.name,
            mrp: args.mrp,
            selling_price: args.selling_price,
            description: args.description,
            sizes: args.sizes,
            variant: args.variant,
            carousel_images: args.carousel_images,
            colors: args.colors,
            assured_image: args.assured_image,
        }
    }
}

fn parse_color(arg: &str) -> Result<ColorOption, String> {
    let (name, image) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected Name=image, got '{arg}'"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err("color name is empty".to_string());
    }
    Ok(ColorOption {
        name: name.to_string(),
        image: image.trim().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_tree_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn edit_parses_field_keys() {
        let cli = Cli::parse_from(["storefront-admin", "products", "edit", "p1", "sellingPrice", "450"]);
        match cli.command {
            Commands::Products(ProductCommand::Edit { id, field, value }) => {
                assert_eq!(id, "p1");
                assert_eq!(field, ProductField::SellingPrice);
                assert_eq!(value, "450");
            }
            other => panic!("unexpected command {other:?}"),
        }

        assert!(Cli::try_parse_from(["storefront-admin", "products", "edit", "p1", "price", "1"]).is_err());
    }

    #[test]
    fn add_collects_repeated_colors() {
        let cli = Cli::parse_from([
            "storefront-admin",
            "--yes",
            "products",
            "add",
            "--id", "p3",
            "--image", "cap.png",
            "--name", "Cap",
            "--mrp", "299",
            "--selling-price", "199",
            "--color", "Red=red.png",
            "--color", "Blue=blue.png",
        ]);
        assert!(cli.yes);
        let Commands::Products(ProductCommand::Add(args)) = cli.command else {
            panic!("expected products add");
        };
        let product = NewProduct::from(args).validate().unwrap();
        assert_eq!(product.colors.len(), 2);
        assert_eq!(product.colors[1].name, "Blue");
    }

    #[test]
    fn colors_need_a_name_and_an_equals_sign() {
        assert!(parse_color("Red").is_err());
        assert!(parse_color("=red.png").is_err());
        assert_eq!(parse_color("Red = r.png").unwrap().image, "r.png");
    }
}
