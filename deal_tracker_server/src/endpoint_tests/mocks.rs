use deal_tracker_engine::{
    db_types::{Deal, DealTimestamps, NewDeal},
    DealStore,
    DealStoreError,
};
use mockall::mock;

mock! {
    pub Store {}
    impl DealStore for Store {
        fn url(&self) -> &str;
        async fn insert_deal(&self, deal: NewDeal) -> Result<i64, DealStoreError>;
        async fn fetch_all_deals(&self) -> Result<Vec<Deal>, DealStoreError>;
        async fn fetch_deal_by_id(&self, id: i64) -> Result<Option<Deal>, DealStoreError>;
        async fn fetch_deal_by_reference(&self, deal_reference: &str) -> Result<Option<Deal>, DealStoreError>;
        async fn update_deal_timestamps(&self, id: i64, timestamps: DealTimestamps) -> Result<Option<Deal>, DealStoreError>;
        async fn delete_deal_by_id(&self, id: i64) -> Result<Option<Deal>, DealStoreError>;
        async fn close(&mut self) -> Result<(), DealStoreError>;
    }
}
