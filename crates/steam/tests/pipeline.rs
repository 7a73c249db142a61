//! End-to-end discovery over a fabricated Steam tree.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use steamclean_steam::manifest::title_dirs;
use steamclean_steam::{check_vdf, fix_game_path, get_libraries};

fn write(path: &Path, contents: &[u8]) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

/// Builds an install root whose manifest lists `library`.
fn fake_install(root: &Path, library: &Path) -> PathBuf {
    let install = root.join("Steam");
    let manifest = format!(
        "\"LibraryFolders\"\n{{\n\t\"TimeNextStatsReport\"\t\t\"1425495426\"\n\t\"1\"\t\t\"{}\"\n}}\n",
        library.display()
    );
    write(
        &install.join("steamapps").join("libraryfolders.vdf"),
        manifest.as_bytes(),
    );
    install
}

#[test]
fn discovers_redistributables_across_libraries() {
    let tmp = tempfile::tempdir().unwrap();
    let library = tmp.path().join("Library");
    let install = fake_install(tmp.path(), &library);

    let libs = get_libraries(&install);
    assert_eq!(libs, vec![library.clone()]);

    let content = fix_game_path(&libs[0]).unwrap();
    assert_eq!(fix_game_path(&content).unwrap(), content);

    let title = content.join("Portal");
    write(
        &title.join("installscript.vdf"),
        b"\"InstallScript\"\n{\n\t\"Run Process\"\n\t{\n\
          \t\t\"DirectX\"\n\t\t{\n\
          \t\t\t\"process 1\"\t\t\"%INSTALLDIR%\\_CommonRedist\\DirectX\\Jun2010\\DXSETUP.exe\"\n\
          \t\t}\n\
          \t\t\"VC\"\n\t\t{\n\
          \t\t\t\"process 1\"\t\t\"%INSTALLDIR%\\_CommonRedist\\vcredist\\vc_redist.x64.exe\"\n\
          \t\t}\n\
          \t\t\"Game\"\n\t\t{\n\
          \t\t\t\"process 1\"\t\t\"%INSTALLDIR%\\portal.exe\"\n\
          \t\t}\n\t}\n}\n",
    );
    write(
        &title.join("_CommonRedist/DirectX/Jun2010/DXSETUP.exe"),
        &vec![1u8; 1024 * 1024],
    );
    write(&title.join("portal.exe"), b"game");
    // vc_redist.x64.exe resolves to "vc_redist.x64" and is never found.
    write(&title.join("_CommonRedist/vcredist/vc_redist.x64.exe"), b"vc");

    let titles = title_dirs(&content).unwrap();
    assert_eq!(titles.len(), 1);

    let found = check_vdf(&titles);
    assert_eq!(found.len(), 1);
    let (path, size) = found.iter().next().unwrap();
    let expected = title.join("_CommonRedist/DirectX/Jun2010/DXSETUP.exe");
    assert_eq!(
        path.to_string_lossy().to_lowercase(),
        expected.to_string_lossy().to_lowercase()
    );
    assert!((size - 1.0).abs() < 1e-9);
}

#[test]
fn missing_library_manifest_yields_nothing_to_scan() {
    let tmp = tempfile::tempdir().unwrap();
    assert!(get_libraries(tmp.path()).is_empty());
    assert!(check_vdf(&BTreeMap::new()).is_empty());
}
