//! Built-in Linux resource defaults.

/// Shell launcher written into the app image root. Reads the descriptor
/// next to itself; no substitution needed.
pub const LAUNCHER_SH: &str = r#"#!/bin/sh
# Generated application launcher. Reads app/package.cfg and starts the JVM.
DIR=$(CDPATH= cd -- "$(dirname -- "$0")" && pwd)
CFG="$DIR/app/package.cfg"
cfg_value() { sed -n "s|^$1=||p" "$CFG" | head -n 1; }
MAIN_JAR=$(cfg_value "app\.mainjar")
MAIN_CLASS=$(cfg_value "app\.mainclass" | tr '/' '.')
APP_CLASSPATH=$(cfg_value "app\.classpath")
JVM_ARGS=$(sed -n 's|^jvmarg\.[0-9]*=||p' "$CFG")
JAVA=java
[ -x "$DIR/runtime/bin/java" ] && JAVA="$DIR/runtime/bin/java"
cd "$DIR/app"
exec "$JAVA" $JVM_ARGS -cp "$MAIN_JAR:$APP_CLASSPATH" "$MAIN_CLASS" "$@"
"#;

pub const CONTROL: &str = r#"Package: {{package_name}}
Version: {{version}}
Section: misc
Priority: optional
Architecture: amd64
Installed-Size: {{installed_size}}
Maintainer: {{maintainer}}
Description: {{description}}
"#;

pub const POSTINST: &str = r#"#!/bin/sh
set -e
if command -v xdg-desktop-menu >/dev/null 2>&1; then
    xdg-desktop-menu install --novendor /opt/{{fs_name}}/{{package_name}}.desktop || true
fi
exit 0
"#;

pub const POSTRM: &str = r#"#!/bin/sh
set -e
if command -v xdg-desktop-menu >/dev/null 2>&1; then
    xdg-desktop-menu uninstall --novendor {{package_name}}.desktop || true
fi
exit 0
"#;

pub const COPYRIGHT: &str = r#"{{copyright}}

License:
{{license_text}}
"#;

pub const DESKTOP: &str = r#"[Desktop Entry]
Name={{application_name}}
Comment={{description}}
Exec=/opt/{{fs_name}}/{{fs_name}}
Icon={{icon_entry}}
Terminal=false
Type=Application
Categories={{category}}
"#;
