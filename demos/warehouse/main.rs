use std::io;

use warehouse_rl::viz::App;

fn main() -> io::Result<()> {
    App::new().run()
}
