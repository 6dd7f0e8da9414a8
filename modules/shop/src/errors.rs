//! Error catalog of the shop module.
//!
//! Every problem the REST layer can return is listed here with its HTTP
//! status, title and stable code.

use http_problem::{ErrDef, Problem, ProblemResponse};

macro_rules! catalog {
    ($($variant:ident => ($status:literal, $title:literal, $code:literal)),+ $(,)?) => {
        #[allow(non_camel_case_types)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub enum ErrorCode {
            $($variant),+
        }

        impl ErrorCode {
            pub const ALL: &'static [ErrorCode] = &[$(ErrorCode::$variant),+];

            pub const fn def(self) -> ErrDef {
                match self {
                    $(ErrorCode::$variant => ErrDef {
                        status: $status,
                        title: $title,
                        code: $code,
                        type_url: concat!("https://errors.slc.local/", $code),
                    }),+
                }
            }
        }
    };
}

catalog! {
    shop_user_not_found_v1 => (404, "User Not Found", "shop.user.not_found.v1"),
    shop_package_not_found_v1 => (404, "Package Not Found", "shop.package.not_found.v1"),
    shop_duration_not_found_v1 => (404, "Duration Not Found", "shop.duration.not_found.v1"),
    shop_out_of_stock_v1 => (400, "Out Of Stock", "shop.stock.out_of_stock.v1"),
    shop_insufficient_balance_v1 => (400, "Insufficient Balance", "shop.balance.insufficient.v1"),
    shop_invalid_amount_v1 => (400, "Invalid Amount", "shop.transfer.invalid_amount.v1"),
    shop_self_transfer_v1 => (400, "Self Transfer", "shop.transfer.self.v1"),
    shop_negative_balance_v1 => (400, "Negative Balance", "shop.balance.negative.v1"),
    shop_validation_v1 => (400, "Validation Error", "shop.request.validation.v1"),
    shop_internal_persistence_v1 => (500, "Internal Error", "shop.internal.persistence.v1"),
}

impl ErrorCode {
    pub fn status(self) -> u16 {
        self.def().status
    }

    pub fn to_problem(self, detail: impl Into<String>) -> Problem {
        self.def().to_problem(detail)
    }

    pub fn respond(self, detail: impl Into<String>, instance: &str) -> ProblemResponse {
        self.def().respond(detail, instance)
    }
}
