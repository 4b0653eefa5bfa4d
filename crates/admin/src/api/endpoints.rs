//! Backend endpoint paths, relative to the configured API base URL.

use core::fmt::Display;

use orderdesk_core::OrderAction;

pub mod users {
    use super::Display;

    pub const LOGIN: &str = "/users/login";
    pub const LOGOUT: &str = "/users/logout";
    pub const VERIFY: &str = "/users/verify";
    pub const REGISTER: &str = "/users/register";
    pub const PROFILE: &str = "/users/profile";
    pub const CHANGE_PASSWORD: &str = "/users/profile/password";
    pub const BASE: &str = "/users";
    pub const SEARCH: &str = "/users/search";
    pub const STATS: &str = "/users/stats";
    pub const BULK: &str = "/users/bulk";

    #[must_use]
    pub fn by_id(id: impl Display) -> String {
        format!("{BASE}/{id}")
    }

    #[must_use]
    pub fn status(id: impl Display) -> String {
        format!("{BASE}/{id}/status")
    }
}

pub mod customers {
    use super::Display;

    pub const BASE: &str = "/customers";

    #[must_use]
    pub fn by_id(id: impl Display) -> String {
        format!("{BASE}/{id}")
    }

    #[must_use]
    pub fn addresses(customer_id: impl Display) -> String {
        format!("{BASE}/{customer_id}/addresses")
    }

    #[must_use]
    pub fn address(address_id: impl Display) -> String {
        format!("{BASE}/addresses/{address_id}")
    }
}

pub mod products {
    use super::Display;

    pub const BASE: &str = "/products";

    #[must_use]
    pub fn by_id(id: impl Display) -> String {
        format!("{BASE}/{id}")
    }

    #[must_use]
    pub fn stock(id: impl Display) -> String {
        format!("{BASE}/{id}/stock")
    }
}

pub mod categories {
    use super::Display;

    pub const BASE: &str = "/categories";

    #[must_use]
    pub fn by_id(id: impl Display) -> String {
        format!("{BASE}/{id}")
    }
}

pub mod orders {
    use super::{Display, OrderAction};

    pub const BASE: &str = "/orders";
    pub const STATS: &str = "/orders/stats";

    #[must_use]
    pub fn by_id(id: impl Display) -> String {
        format!("{BASE}/{id}")
    }

    /// `POST /orders/{id}/{confirm|pay|ship|complete|cancel}`
    #[must_use]
    pub fn action(id: impl Display, action: OrderAction) -> String {
        format!("{BASE}/{id}/{}", action.path_segment())
    }
}

pub mod payments {
    use super::Display;

    pub const BASE: &str = "/payments";
    pub const STATS: &str = "/payments/stats";

    #[must_use]
    pub fn by_id(id: impl Display) -> String {
        format!("{BASE}/{id}")
    }

    #[must_use]
    pub fn by_order(order_id: impl Display) -> String {
        format!("{BASE}/order/{order_id}")
    }
}

pub mod reports {
    use super::Display;

    pub const SCHEDULED: &str = "/reports/scheduled";
    pub const LATEST: &str = "/reports/scheduled/latest";
    pub const GENERATE: &str = "/reports/scheduled/generate";
    pub const DASHBOARD: &str = "/reports/dashboard";
    pub const DAILY_STATS: &str = "/reports/daily-stats";

    #[must_use]
    pub fn scheduled_by_id(id: impl Display) -> String {
        format!("{SCHEDULED}/{id}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths() {
        assert_eq!(users::by_id(5), "/users/5");
        assert_eq!(users::status(5), "/users/5/status");
        assert_eq!(customers::address(9), "/customers/addresses/9");
        assert_eq!(customers::addresses(2), "/customers/2/addresses");
        assert_eq!(products::stock(3), "/products/3/stock");
        assert_eq!(orders::action(7, OrderAction::Ship), "/orders/7/ship");
        assert_eq!(payments::by_order(7), "/payments/order/7");
        assert_eq!(reports::scheduled_by_id(1), "/reports/scheduled/1");
    }
}
