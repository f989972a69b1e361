//! Allocation under concurrency.
//!
//! Many tasks allocate against one shared store and immediately insert;
//! every insert must succeed with a distinct code.

use std::collections::HashSet;
use std::sync::Arc;

use linkforge::services::CodeAllocator;
use linkforge::storage::memory::MemoryStore;
use linkforge::storage::{Link, LinkStore};
use linkforge::utils::{is_valid_code, GENERATED_CODE_LENGTH};

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_allocations_produce_distinct_codes() {
    let store: Arc<dyn LinkStore> = Arc::new(MemoryStore::new());
    let allocator = Arc::new(CodeAllocator::new(Arc::clone(&store)));

    let mut handles = Vec::new();
    for i in 0..100 {
        let allocator = Arc::clone(&allocator);
        let store = Arc::clone(&store);
        handles.push(tokio::spawn(async move {
            let code = allocator.allocate().await.unwrap();
            let link = Link::new(
                code.clone(),
                format!("https://example.com/{}", i),
                "owner-1".to_string(),
            );
            store.insert_link(link).await.unwrap();
            code
        }));
    }

    let mut codes = HashSet::new();
    for handle in handles {
        let code = handle.await.unwrap();
        assert_eq!(code.len(), GENERATED_CODE_LENGTH);
        assert!(is_valid_code(&code), "allocated code failed validation: {code}");
        assert!(codes.insert(code), "duplicate code allocated");
    }

    assert_eq!(codes.len(), 100);
}

#[tokio::test]
async fn test_allocated_code_is_free_until_inserted() {
    let store = Arc::new(MemoryStore::new());
    let allocator = CodeAllocator::new(store.clone() as Arc<dyn LinkStore>);

    let code = allocator.allocate().await.unwrap();
    assert!(!store.exists_by_code(&code).await.unwrap());

    store
        .insert_link(Link::new(
            code.clone(),
            "https://example.com".to_string(),
            "owner-1".to_string(),
        ))
        .await
        .unwrap();
    assert!(store.exists_by_code(&code).await.unwrap());

    // A second allocation now avoids the taken code
    let next = allocator.allocate().await.unwrap();
    assert_ne!(next, code);
}
