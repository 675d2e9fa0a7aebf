use crate::web::fyyur::framework::flash::{FlashMessage, FlashesInterface};
use crate::web::fyyur::Resources;
use actix_web::error::UrlGenerationError;
use actix_web::HttpRequest;
use std::fmt::Write;

/// Navigation bar entries, for highlighting the current section
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MainNavButton {
    Venues,
    Artists,
    Shows,
}

impl MainNavButton {
    fn name(&self) -> &'static str {
        match self {
            MainNavButton::Venues => "venues",
            MainNavButton::Artists => "artists",
            MainNavButton::Shows => "shows",
        }
    }
}

/// Common template data for all Fyyur templates extending the `base.html` template
///
/// This struct must be a part of the template data structure, as the field `base`.
/// The contained data and functions can be used by the individual template's code, as well.
#[derive(Debug)]
pub struct BaseTemplateContext<'a> {
    /// The HTTP request the template is used to respond to. Used for creating ressource urls and
    /// extracting the flash messages
    pub request: &'a HttpRequest,
    /// HTML title
    pub page_title: &'a str,
    pub active_main_nav_button: Option<MainNavButton>,
}

impl BaseTemplateContext<'_> {
    pub fn url_for_static(&self, file: &str) -> Result<String, UrlGenerationError> {
        let mut url = self.request.url_for("static_resources", [file])?;
        url.query_pairs_mut().append_pair(
            "hash",
            &Resources::get(file)
                .map(|f| bytes_to_hex(&f.metadata.sha256_hash()))
                .unwrap_or("unknown".to_string()),
        );
        Ok(url.to_string())
    }

    pub fn get_flashes(&self) -> Vec<FlashMessage> {
        self.request.get_and_clear_flashes()
    }

    /// CSS class of the navigation bar entry with the given name ("venues", "artists", "shows")
    pub fn nav_class(&self, button: &str) -> &'static str {
        if self
            .active_main_nav_button
            .is_some_and(|active| active.name() == button)
        {
            "active"
        } else {
            ""
        }
    }
}

fn bytes_to_hex(bytes: &[u8]) -> String {
    bytes.iter().fold(String::new(), |mut output, b| {
        let _ = write!(output, "{:02x}", b);
        output
    })
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_bytes_to_hex() {
        assert_eq!(super::bytes_to_hex(&[0x00, 0x1f, 0xab]), "001fab");
    }
}
