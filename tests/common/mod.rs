use std::fs;
use std::path::Path;

use covview::report::ReportConfig;
use tempfile::TempDir;

pub const MODULE: &str = "example.com/shop";

const MAIN_GO: &str = "package main

import \"example.com/shop/cart\"

func main() {
	c := cart.New()
	c.Add(3)
	println(c.Total())
}
";

const CART_GO: &str = "package cart

type Cart struct {
	items []int
}

func New() *Cart {
	return &Cart{}
}

func (c *Cart) Add(n int) {
	c.items = append(c.items, n)
}

func (c *Cart) Total() int {
	sum := 0
	for _, n := range c.items {
		sum += n
	}
	if sum > 100 {
		return 100
	}
	return sum
}
";

/// Create a throwaway Go module with two source files and a profile that
/// covers them, returning the directory handle and a config pointing at it.
/// The caller must hold onto `TempDir` to keep the directory alive.
pub fn setup_module(profile: &str) -> (TempDir, ReportConfig) {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();

    fs::write(root.join("go.mod"), format!("module {MODULE}\n\ngo 1.22\n")).unwrap();
    fs::write(root.join("main.go"), MAIN_GO).unwrap();
    fs::create_dir_all(root.join("cart")).unwrap();
    fs::write(root.join("cart/cart.go"), CART_GO).unwrap();
    fs::write(root.join("coverage.out"), profile).unwrap();

    let config = config_for(root);
    (dir, config)
}

pub fn config_for(root: &Path) -> ReportConfig {
    ReportConfig {
        profile: root.join("coverage.out"),
        out_dir: root.join("report"),
        src_root: root.to_path_buf(),
        ..Default::default()
    }
}

/// A profile matching the sources written by `setup_module`.
pub const PROFILE: &str = "mode: set
example.com/shop/main.go:5.13,9.2 3 1
example.com/shop/cart/cart.go:7.19,9.2 1 1
example.com/shop/cart/cart.go:11.28,13.2 1 1
example.com/shop/cart/cart.go:15.27,17.29 2 1
example.com/shop/cart/cart.go:17.29,19.3 1 1
example.com/shop/cart/cart.go:20.2,20.16 1 1
example.com/shop/cart/cart.go:20.16,22.3 1 0
example.com/shop/cart/cart.go:23.2,23.12 1 1
";
