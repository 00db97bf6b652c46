pub mod credit_transactions;
pub mod places;
pub mod profiles;
pub mod purchased_tours;
pub mod sea_orm_active_enums;
pub mod subscription_plans;
pub mod tours;
pub mod user_subscriptions;

pub mod prelude {
    pub use super::credit_transactions::Entity as CreditTransactions;
    pub use super::places::Entity as Places;
    pub use super::profiles::Entity as Profiles;
    pub use super::purchased_tours::Entity as PurchasedTours;
    pub use super::subscription_plans::Entity as SubscriptionPlans;
    pub use super::tours::Entity as Tours;
    pub use super::user_subscriptions::Entity as UserSubscriptions;
}
