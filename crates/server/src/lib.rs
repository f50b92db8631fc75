use axum::{Json, http::StatusCode, response::IntoResponse};
use engine::EngineError;

use serde::Serialize;
pub use pin::MAX_PIN_FAILURES;
pub use server::{ServerConfig, router, run, run_with_listener, spawn_with_listener};

mod dashboard;
mod expenses;
mod groups;
mod notices;
mod notifications;
mod participants;
mod pin;
mod server;
mod statistics;
mod user;
mod wallets;

pub mod types {
    pub mod user {
        pub use api_types::user::{Account, AccountResponse, NicknameUpdate, PasswordUpdate, Profile, SignUp};
    }

    pub mod pin {
        pub use api_types::pin::{PinRegister, PinToken, PinVerify};
    }

    pub mod group {
        pub use api_types::group::{GroupCreated, GroupList, GroupNew, GroupStatus, GroupUpdate, GroupView};
    }

    pub mod participant {
        pub use api_types::participant::{Invite, Invited, Join, JoinPreview, ParticipantList, ParticipantView};
    }

    pub mod wallet {
        pub use api_types::wallet::{DepositCreated, DepositNew, PaidList, WalletView};
    }

    pub mod expense {
        pub use api_types::expense::{
            ExpenseCreated, ExpenseDelete, ExpenseList, ExpenseNew, ExpenseUpdate, ExpenseView,
            ExpensesDeleted,
        };
    }

    pub mod notice {
        pub use api_types::notice::{NoticeCreated, NoticeDelete, NoticeList, NoticeNew, NoticeView, NoticesDeleted};
    }

    pub mod notification {
        pub use api_types::notification::{MarkedRead, NotificationKind, NotificationList, NotificationView};
    }

    pub mod stats {
        pub use api_types::stats::{DailyTotals, MonthQuery, MonthlySummary, MonthlyTrend};
    }

    pub mod dashboard {
        pub use api_types::dashboard::{Dashboard, DepositReminder, LatestNotice};
    }
}

pub enum ServerError {
    Engine(EngineError),
    Generic(String),
}

#[derive(Serialize)]
struct Error {
    error: String,
}

fn status_for_engine_error(err: &EngineError) -> StatusCode {
    match err {
        EngineError::Forbidden(_) => StatusCode::FORBIDDEN,
        EngineError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
        EngineError::KeyNotFound(_) => StatusCode::NOT_FOUND,
        EngineError::ExistingKey(_) => StatusCode::CONFLICT,
        EngineError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        EngineError::InsufficientFunds(_)
        | EngineError::InvalidAmount(_)
        | EngineError::InvalidGroup(_)
        | EngineError::InvalidInput(_)
        | EngineError::InvalidId(_) => StatusCode::UNPROCESSABLE_ENTITY,
    }
}

fn message_for_engine_error(err: EngineError) -> String {
    match err {
        EngineError::Database(db_err) => {
            tracing::error!("database error: {db_err}");
            "internal server error".to_string()
        }
        other => other.to_string(),
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let (status, error) = match self {
            ServerError::Engine(err) => (status_for_engine_error(&err), message_for_engine_error(err)),
            ServerError::Generic(err) => (StatusCode::BAD_REQUEST, err),
        };

        (status, Json(Error { error })).into_response()
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}
