use workpool::ThreadPool;
use std::thread;
use std::time::{Duration, Instant};


fn main(){
    env_logger::init();

    let now = Instant::now();
    let mut pool = ThreadPool::new(4).unwrap();

    let handles: Vec<_> = (0..8)
        .map(|i| {
            pool.execute(move || {
                println!("hello {i}");
                thread::sleep(Duration::from_secs(1));
                println!("world {i}");
                format!("task {i} finished")
            })
            .unwrap()
        })
        .collect();

    for handle in handles {
        match handle.wait() {
            Ok(message) => println!("{message}"),
            Err(err) => println!("task failed: {err}"),
        }
    }

    pool.shutdown();
    println!("elapsed: {:?}",now.elapsed());
}
