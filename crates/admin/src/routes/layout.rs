//! Shared page chrome: navigation, toasts, pagination, and money formatting.

use askama::Template;
use axum::response::Html;
use rust_decimal::Decimal;
use tower_sessions::Session;

use orderdesk_core::{CurrencyCode, Money};

use crate::api::Page as ApiPage;
use crate::middleware::AuthContext;
use crate::models::{CurrentUser, session_keys};
use crate::notify::{self, Toast};

/// Largest page a list screen will request.
const MAX_PAGE_SIZE: u32 = 100;

/// Data every page template receives as `page`.
#[derive(Debug, Clone)]
pub struct Page {
    pub title: String,
    pub current_path: String,
    pub user: Option<CurrentUser>,
    /// Drained from the session when the page is built.
    pub toasts: Vec<Toast>,
}

impl Page {
    /// Page for a logged-in user. Build it after every backend call so
    /// toasts queued by the handler show up.
    pub async fn new(ctx: &AuthContext, current_path: &str, title: &str) -> Self {
        Self {
            title: title.to_string(),
            current_path: current_path.to_string(),
            user: Some(ctx.user.clone()),
            toasts: notify::take(&ctx.session).await,
        }
    }

    /// Page without navigation, for the login and signup screens.
    pub async fn anonymous(session: &Session, current_path: &str, title: &str) -> Self {
        Self {
            title: title.to_string(),
            current_path: current_path.to_string(),
            user: None,
            toasts: notify::take(session).await,
        }
    }

    /// Page for a request that skipped the auth guard. Navigation shows
    /// whoever the session claims to be.
    pub async fn from_session(session: &Session, current_path: &str, title: &str) -> Self {
        let user = session
            .get::<CurrentUser>(session_keys::CURRENT_USER)
            .await
            .ok()
            .flatten();
        Self {
            user,
            ..Self::anonymous(session, current_path, title).await
        }
    }

    /// CSS class for a navigation link.
    #[must_use]
    pub fn nav_class(&self, prefix: &str) -> &'static str {
        let active = self.current_path == prefix
            || self
                .current_path
                .strip_prefix(prefix)
                .is_some_and(|rest| rest.starts_with('/'));
        if active { "nav-link active" } else { "nav-link" }
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.user.as_ref().is_some_and(CurrentUser::is_admin)
    }
}

/// Render a template, logging failures.
pub fn render(template: &impl Template) -> Html<String> {
    Html(template.render().unwrap_or_else(|e| {
        tracing::error!("Template render error: {}", e);
        "Internal Server Error".to_string()
    }))
}

/// Format an amount in the console currency.
#[must_use]
pub fn money(amount: Decimal, currency: CurrencyCode) -> String {
    Money::new(amount, currency).display()
}

/// `offset`/`limit` from a query string, clamped to sane values.
#[must_use]
pub fn page_from_query(offset: Option<u32>, limit: Option<u32>, default_limit: u32) -> ApiPage {
    let limit = limit
        .filter(|l| *l > 0)
        .unwrap_or(default_limit)
        .clamp(1, MAX_PAGE_SIZE);
    ApiPage::new(offset.unwrap_or(0), limit)
}

/// Previous/next links for offset-paginated lists.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pager {
    pub previous_href: Option<String>,
    pub next_href: Option<String>,
    /// 1-based range shown, e.g. "21-40".
    pub range_label: String,
}

impl Pager {
    /// The backend does not return totals, so a full page implies a next page.
    #[must_use]
    pub fn new(page: ApiPage, returned: usize, base_path: &str, filters: &[(&str, String)]) -> Self {
        let href = |target: ApiPage| {
            let mut query = url::form_urlencoded::Serializer::new(String::new());
            for (key, value) in filters {
                if !value.is_empty() {
                    query.append_pair(key, value);
                }
            }
            query.append_pair("offset", &target.offset.to_string());
            query.append_pair("limit", &target.limit.to_string());
            format!("{base_path}?{}", query.finish())
        };

        let has_next = u32::try_from(returned).is_ok_and(|n| n >= page.limit);
        let range_label = if returned == 0 {
            String::new()
        } else {
            format!(
                "{}\u{2013}{}",
                u64::from(page.offset) + 1,
                u64::from(page.offset) + u64::try_from(returned).unwrap_or(u64::MAX)
            )
        };

        Self {
            previous_href: (!page.is_first()).then(|| href(page.previous())),
            next_href: has_next.then(|| href(page.next())),
            range_label,
        }
    }

    #[must_use]
    pub const fn is_needed(&self) -> bool {
        self.previous_href.is_some() || self.next_href.is_some()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn page(path: &str) -> Page {
        Page {
            title: String::new(),
            current_path: path.to_string(),
            user: None,
            toasts: Vec::new(),
        }
    }

    #[test]
    fn test_nav_class() {
        assert_eq!(page("/orders/5").nav_class("/orders"), "nav-link active");
        assert_eq!(page("/orders").nav_class("/orders"), "nav-link active");
        assert_eq!(page("/ordersx").nav_class("/orders"), "nav-link");
        assert_eq!(page("/customers").nav_class("/orders"), "nav-link");
    }

    #[test]
    fn test_page_from_query() {
        assert_eq!(page_from_query(None, None, 20), ApiPage::new(0, 20));
        assert_eq!(page_from_query(Some(40), Some(0), 20), ApiPage::new(40, 20));
        assert_eq!(page_from_query(None, Some(1000), 20), ApiPage::new(0, 100));
    }

    #[test]
    fn test_pager_first_full_page() {
        let pager = Pager::new(
            ApiPage::new(0, 2),
            2,
            "/orders",
            &[("status", "paid".to_string())],
        );
        assert!(pager.previous_href.is_none());
        assert_eq!(
            pager.next_href.as_deref(),
            Some("/orders?status=paid&offset=2&limit=2")
        );
        assert_eq!(pager.range_label, "1\u{2013}2");
    }

    #[test]
    fn test_pager_last_partial_page() {
        let pager = Pager::new(ApiPage::new(20, 20), 3, "/customers", &[]);
        assert_eq!(
            pager.previous_href.as_deref(),
            Some("/customers?offset=0&limit=20")
        );
        assert!(pager.next_href.is_none());
        assert!(pager.is_needed());
    }

    #[test]
    fn test_money() {
        assert_eq!(money(Decimal::new(123_450, 2), CurrencyCode::USD), "$1,234.50");
    }
}
