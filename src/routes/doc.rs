use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        auth::{LoginRequest, LoginResponse},
        consult::{ConsultRequest, ConsultResult, PublicHistoryEntry, PublicOrder},
        debtors::{
            CreateDebtorFromOrderRequest, CreateDebtorRequest, DebtorDraft, DebtorList,
            DebtorSuggestion,
        },
        orders::{
            AppendHistoryRequest, ChecklistItem, CreateOrderRequest, NewOrderForm, OrderList,
            OrderWithHistory, UpdateDetailsRequest,
        },
    },
    models::{Debtor, DebtorStatus, HistoryEntry, Order, OrderStatus, Role, User},
    response::{ApiResponse, Meta},
    routes::{auth, consult, debtors, health, home, orders, params},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        home::landing,
        health::health_check,
        auth::login_form,
        auth::login,
        auth::logout,
        consult::consult_form,
        consult::consult,
        orders::open_orders,
        orders::finished_orders,
        orders::new_order_form,
        orders::create_order,
        orders::get_order,
        orders::append_history,
        orders::update_details,
        orders::delete_order,
        orders::receipt,
        orders::print_view,
        orders::delete_history_entry,
        debtors::list_debtors,
        debtors::new_debtor_form,
        debtors::create_debtor,
        debtors::get_debtor,
        debtors::mark_paid,
        debtors::reopen,
        debtors::delete_debtor,
        debtors::suggest_from_order,
        debtors::create_from_order
    ),
    components(
        schemas(
            User,
            Role,
            Order,
            OrderStatus,
            HistoryEntry,
            Debtor,
            DebtorStatus,
            LoginRequest,
            LoginResponse,
            ConsultRequest,
            ConsultResult,
            PublicOrder,
            PublicHistoryEntry,
            CreateOrderRequest,
            AppendHistoryRequest,
            UpdateDetailsRequest,
            OrderWithHistory,
            OrderList,
            NewOrderForm,
            ChecklistItem,
            CreateDebtorRequest,
            CreateDebtorFromOrderRequest,
            DebtorSuggestion,
            DebtorDraft,
            DebtorList,
            home::Landing,
            health::HealthData,
            params::Pagination,
            params::OrderListQuery,
            Meta,
            ApiResponse<Order>,
            ApiResponse<OrderWithHistory>,
            ApiResponse<OrderList>,
            ApiResponse<Debtor>,
            ApiResponse<DebtorList>,
            ApiResponse<ConsultResult>
        )
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Public", description = "Landing page"),
        (name = "Health", description = "Health check endpoint"),
        (name = "Auth", description = "Staff sessions"),
        (name = "Consultation", description = "Customer order lookup"),
        (name = "Orders", description = "Work orders and their history"),
        (name = "Debtors", description = "Outstanding customer debts"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
