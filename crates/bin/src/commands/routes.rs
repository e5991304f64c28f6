//! Routes command - prints the store API route table.

use storefront::routes::{AccessRequirement, Route, RouteTable};

use crate::output::{OutputFormat, print_table};

fn access_label(access: AccessRequirement) -> &'static str {
    match access {
        AccessRequirement::Public => "public",
        AccessRequirement::Gated => "gated",
    }
}

fn table_rows(table: &RouteTable) -> Vec<Vec<String>> {
    table
        .iter()
        .map(|route: &Route| {
            vec![
                route.name().to_string(),
                format!("{}{}", table.prefix(), route.pattern()),
                access_label(route.access()).to_string(),
            ]
        })
        .collect()
}

/// Run the routes command
pub fn run(format: OutputFormat) -> Result<(), Box<dyn std::error::Error>> {
    let table = RouteTable::store_api()?;

    match format {
        OutputFormat::Human => print_table(&["NAME", "PATTERN", "ACCESS"], &table_rows(&table)),
        OutputFormat::Json => {
            let routes: Vec<&Route> = table.iter().collect();
            let value = serde_json::json!({
                "prefix": table.prefix(),
                "routes": routes,
            });
            println!("{}", serde_json::to_string(&value)?);
        }
    }

    Ok(())
}
