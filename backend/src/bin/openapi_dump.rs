//! Print the OpenAPI document as pretty JSON.

use classifieds::ApiDoc;
use utoipa::OpenApi;

#[expect(
    clippy::print_stdout,
    reason = "The document is the program's output."
)]
fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    println!("{}", ApiDoc::openapi().to_pretty_json()?);
    Ok(())
}
