//! Integration tests for concurrent offer acceptance.
//!
//! Many buyers race for the same offer on a multi-threaded runtime. Exactly
//! one may win; everyone else must be refused without any inventory change.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use std::sync::Arc;

use chrono::{DateTime, Utc};
use frontier_inventory::{InventoryConfig, InventoryService, ItemCatalog};
use frontier_trade::{OfferRequest, TradeConfig, TradeError, TradeMarket};
use frontier_types::{ItemId, SubscriptionTier, TradeItem, TradeStatus, UserId};

fn t0() -> DateTime<Utc> {
    DateTime::from_timestamp(1_700_000_000, 0).unwrap()
}

async fn open_with(svc: &InventoryService, user: UserId, items: &[(&str, u32)]) {
    svc.open_inventory(user, SubscriptionTier::Free).await;
    for (item, qty) in items {
        svc.add_item(user, &ItemId::from(*item), *qty, None).await.unwrap();
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn only_one_of_many_accepts_succeeds() {
    let inventories = Arc::new(InventoryService::new(
        Arc::new(ItemCatalog::starter()),
        InventoryConfig::default(),
    ));
    let seller = UserId::new();
    open_with(&inventories, seller, &[("first_aid_kit", 1)]).await;

    let buyers: Vec<UserId> = (0..16).map(|_| UserId::new()).collect();
    for buyer in &buyers {
        open_with(&inventories, *buyer, &[("battery", 5)]).await;
    }

    let market = Arc::new(TradeMarket::new(Arc::clone(&inventories), TradeConfig::default()));
    let offer = market
        .create_offer(
            seller,
            OfferRequest {
                offering_items: vec![TradeItem::new("first_aid_kit", 1)],
                requesting_items: vec![TradeItem::new("battery", 5)],
                validity_hours: None,
                message: None,
            },
            t0(),
        )
        .await
        .unwrap();

    let mut tasks = Vec::new();
    for buyer in buyers.clone() {
        let market = Arc::clone(&market);
        tasks.push(tokio::spawn(async move {
            (buyer, market.accept_offer(offer.id, buyer, t0()).await)
        }));
    }

    let mut winners = Vec::new();
    for task in tasks {
        let (buyer, result) = task.await.unwrap();
        match result {
            Ok(record) => winners.push((buyer, record)),
            Err(TradeError::InvalidOfferState {
                status: TradeStatus::Completed,
                ..
            }) => {}
            Err(other) => panic!("unexpected error: {other}"),
        }
    }
    assert_eq!(winners.len(), 1);
    let (winner, record) = &winners[0];
    assert_eq!(record.buyer_id, *winner);

    let kit = ItemId::from("first_aid_kit");
    let battery = ItemId::from("battery");
    let seller_inv = inventories.snapshot(seller).await.unwrap();
    assert_eq!(seller_inv.quantity_of(&kit, None), 0);
    assert_eq!(seller_inv.quantity_of(&battery, None), 5);

    for buyer in &buyers {
        let inv = inventories.snapshot(*buyer).await.unwrap();
        if buyer == winner {
            assert_eq!(inv.quantity_of(&kit, None), 1);
            assert_eq!(inv.quantity_of(&battery, None), 0);
        } else {
            assert_eq!(inv.quantity_of(&kit, None), 0);
            assert_eq!(inv.quantity_of(&battery, None), 5);
        }
    }
    assert_eq!(market.history_for(seller).await.len(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn crossing_trades_between_two_users_do_not_deadlock() {
    let inventories = Arc::new(InventoryService::new(
        Arc::new(ItemCatalog::starter()),
        InventoryConfig::default(),
    ));
    let alice = UserId::new();
    let bob = UserId::new();
    open_with(&inventories, alice, &[("wood", 50), ("rope", 10)]).await;
    open_with(&inventories, bob, &[("wood", 50), ("rope", 10)]).await;
    let market = Arc::new(TradeMarket::new(Arc::clone(&inventories), TradeConfig::default()));

    let request = || OfferRequest {
        offering_items: vec![TradeItem::new("wood", 1)],
        requesting_items: vec![TradeItem::new("rope", 1)],
        validity_hours: None,
        message: None,
    };

    let mut offers = Vec::new();
    for _ in 0..5 {
        offers.push((market.create_offer(alice, request(), t0()).await.unwrap().id, bob));
        offers.push((market.create_offer(bob, request(), t0()).await.unwrap().id, alice));
    }

    let mut tasks = Vec::new();
    for (offer_id, accepter) in offers {
        let market = Arc::clone(&market);
        tasks.push(tokio::spawn(async move {
            market.accept_offer(offer_id, accepter, t0()).await
        }));
    }
    for task in tasks {
        task.await.unwrap().unwrap();
    }

    let wood = ItemId::from("wood");
    let rope = ItemId::from("rope");
    for user in [alice, bob] {
        let inv = inventories.snapshot(user).await.unwrap();
        assert_eq!(inv.quantity_of(&wood, None), 50);
        assert_eq!(inv.quantity_of(&rope, None), 10);
    }
}
