use json_kv_store::{JsonFileStore, KeyValueStore, MemoryStore, TypedStoreExt, Value};
use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Serialize, Deserialize)]
struct Fruit {
    name: String,
    count: u32,
}

fn fill(store: &dyn KeyValueStore) -> Result<(), json_kv_store::Error> {
    store.set("apples", 3.into())?;
    store.set("bananas", 5.into())?;
    store.set("cherries", 1.into())?;
    store.set("note", "picked today".into())?;
    Ok(())
}

fn main() -> Result<(), json_kv_store::Error> {
    // RUST_LOG=json_kv_store=debug shows every load and write.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let dir = std::env::temp_dir().join("json_kv_store_demo");
    let path = dir.join("fruit.json");
    let file = JsonFileStore::builder(&path).pretty(true).build();
    let memory = MemoryStore::new();

    // Same code, either backend.
    for store in [&file as &dyn KeyValueStore, &memory] {
        fill(store)?;
        println!("apples  = {:?}", store.get("apples")?);
        println!("plums   = {:?}", store.get_or("plums", Value::Int(0))?);
        println!("missing = {:?}", store.get_or_fail("plums").err());

        store.sort(true)?;
        println!("sorted keys = {:?}", store.keys()?);
        println!("count = {}", store.count()?);
    }

    file.set_typed("favourite", &Fruit { name: "mango".into(), count: 2 })?;
    println!("favourite = {:?}", file.get_typed::<Fruit>("favourite")?);

    match file.set("raw", Value::binary(vec![0xde, 0xad])) {
        Err(e) => println!("binary rejected: {e}"),
        Ok(()) => println!("binary stored?"),
    }

    println!("\nOn-disk JSON:\n{}", std::fs::read_to_string(file.path()).unwrap_or_default());

    file.clear()?;
    let _ = std::fs::remove_dir_all(&dir);
    Ok(())
}
